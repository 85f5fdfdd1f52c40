use std::fmt;

/// The operations the capability module exposes, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Add an employee to a group.
    AddMembers,
    /// Remove an employee from a group.
    RemoveMembers,
    /// Apply membership changes listed in a CSV file.
    BulkRequest,
    /// Remove unknown accounts from a device.
    RemoveAccounts,
}

impl ActionKind {
    /// All kinds in the order they appear in the menu.
    pub const ALL: [ActionKind; 4] = [
        ActionKind::AddMembers,
        ActionKind::RemoveMembers,
        ActionKind::BulkRequest,
        ActionKind::RemoveAccounts,
    ];

    /// The single-character selector typed at the menu prompt.
    pub fn selector(self) -> &'static str {
        match self {
            ActionKind::AddMembers => "1",
            ActionKind::RemoveMembers => "2",
            ActionKind::BulkRequest => "3",
            ActionKind::RemoveAccounts => "4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::AddMembers => "Add Members to Groups",
            ActionKind::RemoveMembers => "Remove Members from Groups",
            ActionKind::BulkRequest => "Bulk Requests",
            ActionKind::RemoveAccounts => "Remove Unknown Accounts",
        }
    }

    /// Name of the capability module function backing this action.
    pub fn function(self) -> &'static str {
        match self {
            ActionKind::AddMembers => "Add-GroupMemberships",
            ActionKind::RemoveMembers => "Remove-GroupMemberships",
            ActionKind::BulkRequest => "Invoke-ModifyGroupsFromCsv",
            ActionKind::RemoveAccounts => "Remove-Accounts",
        }
    }

    /// Prompts for the function's positional parameters, in call order.
    pub fn prompts(self) -> &'static [&'static str] {
        match self {
            ActionKind::AddMembers | ActionKind::RemoveMembers => {
                &["Enter the employee ID: ", "Enter the group name: "]
            },
            ActionKind::BulkRequest => &["Enter the path to your CSV: "],
            ActionKind::RemoveAccounts => &["Enter the device name: "],
        }
    }

    pub fn from_selector(selector: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.selector() == selector)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One invocation of an action with the parameters the user typed.
///
/// Parameters are kept exactly as read (trimmed, possibly empty) and are passed
/// to the module function positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    kind: ActionKind,
    params: Vec<String>,
}

impl ActionRequest {
    pub fn new(kind: ActionKind, params: Vec<String>) -> Self {
        debug_assert_eq!(
            params.len(),
            kind.prompts().len(),
            "parameter count must match the prompts of {kind:?}"
        );
        Self { kind, params }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}
