// staffing-backend/src/domain/identity.rs

use super::primary_role::PrimaryRole;
use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

/// 呼び出し元ユーザーの識別情報
///
/// 操作ごとにディレクトリから再取得する（ロールは呼び出し間で変わり得るため）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallerIdentity {
    pub user_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub primary_roles: BTreeSet<PrimaryRole>,
}

impl CallerIdentity {
    pub fn has_role(&self, role: PrimaryRole) -> bool {
        self.primary_roles.contains(&role)
    }

    pub fn is_in_organization(&self, organization_id: Uuid) -> bool {
        self.organization_id == Some(organization_id)
    }
}
