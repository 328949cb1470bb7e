use crate::filters::TicketFilter;
use crate::models::tickets::{Column, Entity, Model};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};

pub struct TicketRepository;

impl TicketRepository {
    pub fn apply_filter(query: Select<Entity>, filter: &TicketFilter) -> Select<Entity> {
        let mut condition = Condition::all();

        if let Some(search) = filter.search_text() {
            let pattern = contains_pattern(search);
            condition = condition.add(
                Condition::any()
                    .add(lower(Column::Title).like(LikeExpr::new(pattern.clone()).escape('\\')))
                    .add(lower(Column::Description).like(LikeExpr::new(pattern).escape('\\'))),
            );
        }
        if let Some(status) = filter.status {
            condition = condition.add(Column::Status.eq(status));
        }
        if let Some(user_id) = filter.involving_user {
            condition = condition.add(
                Condition::any()
                    .add(Column::CreatedById.eq(user_id))
                    .add(Column::AssignedToId.eq(user_id)),
            );
        }

        query.filter(condition)
    }

    /// Newest first; ids break ties between tickets created in the same instant.
    pub fn apply_default_ordering(query: Select<Entity>) -> Select<Entity> {
        query
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
    }

    fn select(filter: &TicketFilter) -> Select<Entity> {
        Self::apply_default_ordering(Self::apply_filter(Entity::find(), filter))
    }

    pub async fn find_all<C: ConnectionTrait>(
        db: &C,
        filter: &TicketFilter,
    ) -> Result<Vec<Model>, DbErr> {
        Self::select(filter).all(db).await
    }

    /// At most `limit` matching tickets, newest first.
    pub async fn find_recent<C: ConnectionTrait>(
        db: &C,
        filter: &TicketFilter,
        limit: u64,
    ) -> Result<Vec<Model>, DbErr> {
        Self::select(filter).limit(limit).all(db).await
    }

    /// One page of matching tickets plus the total match count. `page` is 1-based.
    pub async fn filter<C: ConnectionTrait>(
        db: &C,
        filter: &TicketFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Model>, u64), DbErr> {
        let paginator = Self::select(filter).paginate(db, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total))
    }

    pub async fn count<C: ConnectionTrait>(db: &C, filter: &TicketFilter) -> Result<u64, DbErr> {
        Self::apply_filter(Entity::find(), filter).count(db).await
    }
}

/// SQLite's `lower()` folds ASCII only, so the pattern side must fold the same way.
fn lower(column: Column) -> Expr {
    Expr::expr(Func::lower(Expr::col(column)))
}

/// `%text%` with ASCII letters lowered and LIKE wildcards escaped by `\`.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.to_ascii_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
