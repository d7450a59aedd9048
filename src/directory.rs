use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;

/// A workspace member as reported by the membership directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub member_id: String,
    pub user_id: String,
    pub display_name: String,
    /// Derived handle: the local part of the member's account identifier, or
    /// their profile name when no identifier exists. Mentions resolve against
    /// this, case-insensitively.
    pub handle: String,
}

/// Membership lookup, an external collaborator of the engine. Implementations
/// wrap whatever directory the hosting application keeps its members in.
#[async_trait::async_trait]
pub trait MembershipDirectory: Send + Sync {
    /// Members of a workspace, in directory iteration order. An unknown
    /// workspace yields an empty list, not an error.
    async fn list_members(&self, workspace_id: &str) -> Result<Vec<Member>>;

    async fn is_member(&self, workspace_id: &str, user_id: &str) -> Result<bool>;
}

/// Fixed in-memory membership table.
#[derive(Default)]
pub struct StaticDirectory {
    workspaces: HashMap<String, Vec<Member>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, workspace_id: &str, member: Member) {
        self.workspaces
            .entry(workspace_id.to_owned())
            .or_default()
            .push(member);
    }
}

#[async_trait::async_trait]
impl MembershipDirectory for StaticDirectory {
    async fn list_members(&self, workspace_id: &str) -> Result<Vec<Member>> {
        Ok(self.workspaces.get(workspace_id).cloned().unwrap_or_default())
    }

    async fn is_member(&self, workspace_id: &str, user_id: &str) -> Result<bool> {
        Ok(self
            .workspaces
            .get(workspace_id)
            .is_some_and(|members| members.iter().any(|m| m.user_id == user_id)))
    }
}
