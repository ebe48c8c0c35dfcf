//! Audit-log rendering.

use std::collections::HashMap;

use serde::Serialize;

use super::datetime::format_datetime;
use super::types::{Link, TransactionEntry};
use crate::billing::{AccountTransaction, TransactionKind, UserHandle, uri};
use crate::policy::Viewer;
use phortune_shared::types::{AccountId, UserId};

/// Links a user by handle, or to a placeholder when the user is unknown.
#[must_use]
pub fn user_link(id: UserId, handles: &HashMap<UserId, UserHandle>) -> Link {
    match handles.get(&id) {
        Some(handle) => Link::new(handle.username.clone(), uri::user(&handle.username)),
        None => Link::new("Unknown Object (User)", "#"),
    }
}

/// Timeline of audit transactions for one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionView {
    /// Object the transactions target.
    pub object_id: AccountId,
    /// Rendered entries, oldest first.
    pub entries: Vec<TransactionEntry>,
}

impl TransactionView {
    /// Renders transactions into timeline entries.
    ///
    /// `handles` must contain every user referenced by the transactions;
    /// missing users render as "Unknown Object (User)".
    #[must_use]
    pub fn build(
        object_id: AccountId,
        transactions: &[AccountTransaction],
        handles: &HashMap<UserId, UserHandle>,
        viewer: &Viewer,
    ) -> Self {
        let mut ordered: Vec<&AccountTransaction> = transactions.iter().collect();
        ordered.sort_by_key(|x| (x.created_at, x.id));

        let entries = ordered
            .into_iter()
            .map(|xaction| {
                let author = user_link(xaction.author_id, handles);
                TransactionEntry {
                    id: xaction.id.into_inner(),
                    icon: icon(&xaction.kind).to_string(),
                    title: title(&author.name, &xaction.kind, handles),
                    date: format_datetime(xaction.created_at, viewer),
                    author,
                }
            })
            .collect();

        Self { object_id, entries }
    }
}

fn icon(kind: &TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Create => "fa-plus",
        TransactionKind::Name { .. } => "fa-pencil",
        TransactionKind::Members { .. } => "fa-users",
    }
}

fn title(author: &str, kind: &TransactionKind, handles: &HashMap<UserId, UserHandle>) -> String {
    match kind {
        TransactionKind::Create => format!("{author} created this payment account."),
        TransactionKind::Name { old: None, new } => {
            format!("{author} named this payment account \"{new}\".")
        }
        TransactionKind::Name {
            old: Some(old),
            new,
        } => format!("{author} renamed this payment account from \"{old}\" to \"{new}\"."),
        TransactionKind::Members { added, removed } => {
            let names = |ids: &[UserId]| {
                ids.iter()
                    .map(|id| user_link(*id, handles).name)
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            match (added.is_empty(), removed.is_empty()) {
                (false, true) => format!(
                    "{author} added {} member(s): {}.",
                    added.len(),
                    names(added)
                ),
                (true, false) => format!(
                    "{author} removed {} member(s): {}.",
                    removed.len(),
                    names(removed)
                ),
                (false, false) => format!(
                    "{author} edited member(s), added {}: {}; removed {}: {}.",
                    added.len(),
                    names(added),
                    removed.len(),
                    names(removed)
                ),
                (true, true) => format!("{author} edited the members of this payment account."),
            }
        }
    }
}
