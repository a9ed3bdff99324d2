// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// ディレクトリ（組織・部門・ユーザー・主ロール）
mod m20250801_000001_create_directory_tables;

// プロジェクト・カスタムロール・メンバーシップ
mod m20250801_000002_create_project_tables;

// 稼働時間台帳
mod m20250801_000003_create_work_hours_table;

// アサイン／アサイン解除の提案
mod m20250801_000004_create_proposal_tables;

// 部門マネージャー向け通知
mod m20250801_000005_create_notifications_table;

// 技術スタック
mod m20250801_000006_create_technology_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 基本テーブル作成（依存関係順）
            Box::new(m20250801_000001_create_directory_tables::Migration),
            Box::new(m20250801_000002_create_project_tables::Migration),
            // 2. 台帳と提案ワークフロー
            Box::new(m20250801_000003_create_work_hours_table::Migration),
            Box::new(m20250801_000004_create_proposal_tables::Migration),
            Box::new(m20250801_000005_create_notifications_table::Migration),
            // 3. プロジェクトカタログの付帯情報
            Box::new(m20250801_000006_create_technology_tables::Migration),
        ]
    }
}
