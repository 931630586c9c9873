//! Generic list/get/create/replace/delete over any sea-orm entity that
//! implements [`Resource`] (and [`Editable`] for writable ones).

use crate::config::AppConfig;
use crate::db::{Page, QueryBuilder, SearchBuilder};
use crate::errors::ServiceError;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, FromQueryResult, IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

/// Read side of a table exposed over the API
pub trait Resource: Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model, Column = Self::Column>;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + Serialize
        + Clone
        + Send
        + Sync
        + 'static;
    type Column: ColumnTrait + Send + Sync;

    /// Singular name used in error messages
    const NAME: &'static str;

    fn id_column() -> Self::Column;

    fn search_columns() -> Vec<Self::Column>;

    fn order_column() -> Self::Column;

    /// Soft-delete flag, when the table has one
    fn active_column() -> Option<Self::Column> {
        None
    }
}

/// Write side: typed input, full replacement, soft or hard delete
#[async_trait]
pub trait Editable: Resource {
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;
    type Input: DeserializeOwned + Validate + Send + Sync + 'static;

    fn create(input: Self::Input, config: &AppConfig) -> Self::ActiveModel;

    /// Overwrites every editable column of `model` with `input`
    fn replace(model: Self::Model, input: Self::Input, config: &AppConfig) -> Self::ActiveModel;

    /// `Some` deactivates instead of deleting
    fn deactivate(_model: Self::Model) -> Option<Self::ActiveModel> {
        None
    }

    /// Rejects changes to rows that must not be edited anymore
    fn guard_change(_model: &Self::Model) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Checks that referenced rows exist
    async fn check_references(
        _input: &Self::Input,
        _db: &DatabaseConnection,
    ) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Rows of `Self` belong to a row of `P`
pub trait ChildOf<P: Resource>: Resource {
    fn parent_column() -> Self::Column;
}

/// Query string accepted by every list endpoint
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number
    pub page: Option<u64>,
    /// Items per page, capped by configuration
    pub limit: Option<u64>,
    /// Substring matched against the resource's text columns
    pub search: Option<String>,
    /// Include soft-deleted rows
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Clone)]
pub struct CrudService {
    db: Arc<DatabaseConnection>,
    config: Arc<AppConfig>,
}

impl CrudService {
    pub fn new(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    pub async fn list<R: Resource>(&self, params: ListParams) -> Result<Page<R::Model>, ServiceError> {
        self.list_filtered::<R>(params, None).await
    }

    pub async fn list_children<R, P>(
        &self,
        parent_id: Uuid,
        params: ListParams,
    ) -> Result<Page<R::Model>, ServiceError>
    where
        R: ChildOf<P>,
        P: Resource,
    {
        self.get::<P>(parent_id).await?;
        let by_parent = Condition::all().add(R::parent_column().eq(parent_id));
        self.list_filtered::<R>(params, Some(by_parent)).await
    }

    #[instrument(skip(self, params, extra), fields(resource = R::NAME))]
    async fn list_filtered<R: Resource>(
        &self,
        params: ListParams,
        extra: Option<Condition>,
    ) -> Result<Page<R::Model>, ServiceError> {
        let page = params.page.unwrap_or(1).max(1);
        let limit = self.config.page_size(params.limit);
        // The row offset must fit a signed 64-bit OFFSET
        let offset_fits = (page - 1)
            .checked_mul(limit)
            .map_or(false, |offset| i64::try_from(offset).is_ok());
        if !offset_fits {
            return Err(ServiceError::BadRequest(format!(
                "page {page} is out of range for limit {limit}"
            )));
        }

        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|term| {
                R::search_columns()
                    .into_iter()
                    .fold(SearchBuilder::new(), |builder, column| {
                        builder.add_like(column, term)
                    })
                    .build()
            });

        let active = if params.include_inactive {
            None
        } else {
            R::active_column().map(|column| Condition::all().add(column.eq(true)))
        };

        let result = QueryBuilder::<R::Entity>::new()
            .filter_opt(extra)
            .filter_opt(search)
            .filter_opt(active)
            .order_by(R::order_column(), true)
            .paginate(page, limit)
            .execute(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        debug!(total = result.total, page, limit, "listed rows");
        Ok(result)
    }

    pub async fn get<R: Resource>(&self, id: Uuid) -> Result<R::Model, ServiceError> {
        R::Entity::find()
            .filter(R::id_column().eq(id))
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found(R::NAME, id))
    }

    #[instrument(skip(self, input), fields(resource = R::NAME))]
    pub async fn create<R>(&self, input: R::Input) -> Result<R::Model, ServiceError>
    where
        R: Editable,
        R::Model: IntoActiveModel<R::ActiveModel>,
    {
        input.validate()?;
        R::check_references(&input, &self.db).await?;

        let model = R::create(input, &self.config)
            .insert(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        info!("{} created", R::NAME);
        Ok(model)
    }

    #[instrument(skip(self, input), fields(resource = R::NAME))]
    pub async fn replace<R>(&self, id: Uuid, input: R::Input) -> Result<R::Model, ServiceError>
    where
        R: Editable,
        R::Model: IntoActiveModel<R::ActiveModel>,
    {
        let existing = self.get::<R>(id).await?;
        R::guard_change(&existing)?;
        input.validate()?;
        R::check_references(&input, &self.db).await?;

        let model = R::replace(existing, input, &self.config)
            .update(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        info!(%id, "{} replaced", R::NAME);
        Ok(model)
    }

    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn delete<R>(&self, id: Uuid) -> Result<(), ServiceError>
    where
        R: Editable,
        R::Model: IntoActiveModel<R::ActiveModel>,
    {
        let existing = self.get::<R>(id).await?;
        R::guard_change(&existing)?;

        match R::deactivate(existing) {
            Some(active) => {
                active
                    .update(&*self.db)
                    .await
                    .map_err(ServiceError::db_error)?;
                info!(%id, "{} deactivated", R::NAME);
            }
            None => {
                R::Entity::delete_many()
                    .filter(R::id_column().eq(id))
                    .exec(&*self.db)
                    .await
                    .map_err(ServiceError::db_error)?;
                info!(%id, "{} deleted", R::NAME);
            }
        }
        Ok(())
    }
}

/// Fails with 400 when `id` does not name an existing `R`
pub async fn ensure_exists<R: Resource>(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let found = R::Entity::find()
        .filter(R::id_column().eq(id))
        .count(db)
        .await
        .map_err(ServiceError::db_error)?;

    if found == 0 {
        return Err(ServiceError::BadRequest(format!(
            "referenced {} {} does not exist",
            R::NAME,
            id
        )));
    }
    Ok(())
}

pub async fn ensure_exists_opt<R: Resource>(
    db: &DatabaseConnection,
    id: Option<Uuid>,
) -> Result<(), ServiceError> {
    match id {
        Some(id) => ensure_exists::<R>(db, id).await,
        None => Ok(()),
    }
}
