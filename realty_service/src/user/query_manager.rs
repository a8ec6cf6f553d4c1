use realty_query::query::{
    list::RawListQuery,
    paginate::PaginateOptions,
    pagination::PaginationEnvelope,
    search::SearchFields,
};

use crate::{context::QueryContext, error::AppResult};

use super::{USERS, model::User};

#[derive(Debug, Clone)]
pub struct UserQueryManager {
    context: QueryContext,
}

impl UserQueryManager {
    pub fn new(context: QueryContext) -> Self {
        Self { context }
    }

    /// Lists users by email or name. Credentials are never returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is invalid or the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn find_all(&self, raw: &RawListQuery) -> AppResult<PaginationEnvelope<User>> {
        let options = PaginateOptions {
            search_fields: SearchFields::text(["email", "firstName", "lastName"]),
            select_fields: Some(User::public_projection()),
            ..Default::default()
        };
        self.context.list(USERS, raw, &options).await
    }
}
