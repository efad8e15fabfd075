use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{
    Category, CategoryCmd, ResultEngine, TransactionKind, categories, transactions,
    util::{Validator, is_hex_color, normalize_optional_text},
};

use super::{Engine, with_tx};

/// Validated, normalized category fields.
struct CategoryFields {
    name: String,
    kind: TransactionKind,
    color: Option<String>,
    icon: Option<String>,
}

fn validate_category(cmd: &CategoryCmd) -> ResultEngine<CategoryFields> {
    let mut validator = Validator::new();
    let name = validator.required_name(&cmd.name, "category");
    let color = normalize_optional_text(cmd.color.as_deref());
    if let Some(color) = &color {
        validator.check(
            is_hex_color(color),
            "color must be a valid hex color (#RRGGBB)",
        );
    }
    validator.finish()?;

    Ok(CategoryFields {
        name,
        kind: cmd.kind,
        color: color.map(|c| c.to_uppercase()),
        icon: normalize_optional_text(cmd.icon.as_deref()),
    })
}

impl Engine {
    /// Creates a category for `cmd.user_id`.
    pub async fn new_category(&self, cmd: CategoryCmd) -> ResultEngine<Category> {
        let fields = validate_category(&cmd)?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, cmd.user_id).await?;

            let category = Category {
                id: Uuid::new_v4(),
                user_id: cmd.user_id,
                name: fields.name,
                kind: fields.kind,
                color: fields.color,
                icon: fields.icon,
            };
            categories::ActiveModel::from(&category)
                .insert(&db_tx)
                .await?;
            Ok(category)
        })
    }

    /// Lists the categories of a user ordered by name, optionally only one
    /// kind.
    pub async fn categories(
        &self,
        user_id: Uuid,
        kind: Option<TransactionKind>,
    ) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| {
            let mut query = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .order_by_asc(Expr::cust("LOWER(name)"))
                .order_by_asc(categories::Column::Id);
            if let Some(kind) = kind {
                query = query.filter(categories::Column::Kind.eq(kind.as_str()));
            }

            query
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Category::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn category(&self, user_id: Uuid, category_id: Uuid) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, user_id, category_id).await?;
            Category::try_from(model)
        })
    }

    /// Replaces name, kind, color and icon of a category.
    ///
    /// Transactions already labeled with it keep their own kind.
    pub async fn update_category(
        &self,
        category_id: Uuid,
        cmd: CategoryCmd,
    ) -> ResultEngine<Category> {
        let fields = validate_category(&cmd)?;
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, cmd.user_id, category_id)
                .await?;

            let active = categories::ActiveModel {
                id: ActiveValue::Set(category_id),
                name: ActiveValue::Set(fields.name),
                kind: ActiveValue::Set(fields.kind.as_str().to_string()),
                color: ActiveValue::Set(fields.color),
                icon: ActiveValue::Set(fields.icon),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Category::try_from(model)
        })
    }

    /// Deletes a category. Its transactions stay, uncategorized.
    ///
    /// Wallet balances do not depend on categories, so nothing is
    /// recalculated.
    pub async fn delete_category(&self, user_id: Uuid, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, user_id, category_id)
                .await?;

            transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::CategoryId,
                    Expr::val(Option::<Uuid>::None).into(),
                )
                .filter(transactions::Column::CategoryId.eq(category_id))
                .exec(&db_tx)
                .await?;
            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
