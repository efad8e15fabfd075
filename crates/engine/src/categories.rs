//! Per-user transaction categories.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, TransactionKind};

/// A user-defined label attachable to transactions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: TransactionKind,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// Categories every new user starts with: `(name, kind, color, icon)`.
pub(crate) const DEFAULT_CATEGORIES: &[(&str, TransactionKind, &str, &str)] = &[
    ("Salary", TransactionKind::Income, "#2ECC71", "briefcase"),
    ("Freelance", TransactionKind::Income, "#27AE60", "laptop"),
    ("Other Income", TransactionKind::Income, "#1ABC9C", "plus-circle"),
    ("Food", TransactionKind::Expense, "#E74C3C", "utensils"),
    ("Transport", TransactionKind::Expense, "#3498DB", "car"),
    ("Shopping", TransactionKind::Expense, "#9B59B6", "shopping-bag"),
    ("Bills", TransactionKind::Expense, "#F39C12", "file-text"),
    ("Entertainment", TransactionKind::Expense, "#E91E63", "film"),
    ("Health", TransactionKind::Expense, "#16A085", "heart"),
    ("Other", TransactionKind::Expense, "#95A5A6", "more-horizontal"),
];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(value: &Category) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id),
            name: ActiveValue::Set(value.name.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            color: ActiveValue::Set(value.color.clone()),
            icon: ActiveValue::Set(value.icon.clone()),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            color: model.color,
            icon: model.icon,
        })
    }
}
