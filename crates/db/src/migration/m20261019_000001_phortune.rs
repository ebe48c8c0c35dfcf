//! Billing schema: accounts, members, payment methods, carts, purchases,
//! charges and the account audit log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(PAYMENT_METHODS_SQL).await?;
        db.execute_unprepared(CARTS_SQL).await?;
        db.execute_unprepared(CHARGES_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE policy_kind AS ENUM ('public', 'members', 'no_one');

CREATE TYPE payment_method_status AS ENUM ('active', 'disabled');

CREATE TYPE cart_status AS ENUM (
    'building',
    'ready',
    'purchasing',
    'charged',
    'hold',
    'review',
    'purchased'
);

CREATE TYPE charge_status AS ENUM ('charging', 'charged', 'hold', 'failed');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(64) NOT NULL UNIQUE,
    real_name VARCHAR(255) NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE phortune_accounts (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    view_policy policy_kind NOT NULL DEFAULT 'members',
    edit_policy policy_kind NOT NULL DEFAULT 'members',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE phortune_account_members (
    account_id BIGINT NOT NULL REFERENCES phortune_accounts(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (account_id, user_id)
);

CREATE INDEX idx_account_members_user ON phortune_account_members(user_id);
";

const PAYMENT_METHODS_SQL: &str = r"
CREATE TABLE phortune_payment_methods (
    id BIGSERIAL PRIMARY KEY,
    account_id BIGINT NOT NULL REFERENCES phortune_accounts(id) ON DELETE CASCADE,
    author_id UUID NOT NULL REFERENCES users(id),
    name VARCHAR(255) NOT NULL DEFAULT '',
    status payment_method_status NOT NULL DEFAULT 'active',
    provider_key VARCHAR(32) NOT NULL,
    brand VARCHAR(64) NOT NULL,
    last_four_digits CHAR(4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_payment_methods_account ON phortune_payment_methods(account_id);
";

const CARTS_SQL: &str = r"
CREATE TABLE phortune_carts (
    id BIGSERIAL PRIMARY KEY,
    account_id BIGINT NOT NULL REFERENCES phortune_accounts(id) ON DELETE CASCADE,
    author_id UUID NOT NULL REFERENCES users(id),
    status cart_status NOT NULL DEFAULT 'building',
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_carts_account_status ON phortune_carts(account_id, status);

CREATE TABLE phortune_purchases (
    id BIGSERIAL PRIMARY KEY,
    cart_id BIGINT NOT NULL REFERENCES phortune_carts(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    base_price NUMERIC(19, 4) NOT NULL,
    quantity INTEGER NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_purchase_quantity CHECK (quantity > 0)
);

CREATE INDEX idx_purchases_cart ON phortune_purchases(cart_id);
";

const CHARGES_SQL: &str = r"
CREATE TABLE phortune_charges (
    id BIGSERIAL PRIMARY KEY,
    account_id BIGINT NOT NULL REFERENCES phortune_accounts(id) ON DELETE CASCADE,
    cart_id BIGINT NOT NULL REFERENCES phortune_carts(id) ON DELETE CASCADE,
    author_id UUID NOT NULL REFERENCES users(id),
    provider_key VARCHAR(32) NOT NULL,
    payment_method_id BIGINT REFERENCES phortune_payment_methods(id) ON DELETE SET NULL,
    amount NUMERIC(19, 4) NOT NULL,
    currency CHAR(3) NOT NULL DEFAULT 'USD',
    status charge_status NOT NULL DEFAULT 'charging',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_charges_account ON phortune_charges(account_id, id);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE phortune_account_transactions (
    id BIGSERIAL PRIMARY KEY,
    account_id BIGINT NOT NULL REFERENCES phortune_accounts(id) ON DELETE CASCADE,
    author_id UUID NOT NULL REFERENCES users(id),
    transaction_type VARCHAR(32) NOT NULL,
    old_value JSONB,
    new_value JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_transaction_type CHECK (transaction_type IN ('create', 'name', 'members'))
);

CREATE INDEX idx_account_transactions_account
    ON phortune_account_transactions(account_id, created_at);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS phortune_account_transactions CASCADE;
DROP TABLE IF EXISTS phortune_charges CASCADE;
DROP TABLE IF EXISTS phortune_purchases CASCADE;
DROP TABLE IF EXISTS phortune_carts CASCADE;
DROP TABLE IF EXISTS phortune_payment_methods CASCADE;
DROP TABLE IF EXISTS phortune_account_members CASCADE;
DROP TABLE IF EXISTS phortune_accounts CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS charge_status;
DROP TYPE IF EXISTS cart_status;
DROP TYPE IF EXISTS payment_method_status;
DROP TYPE IF EXISTS policy_kind;
";
