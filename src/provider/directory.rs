//! Internal user / list directory adapter.
//!
//! Unlike the catalog adapters this one queries the system's own store
//! through the narrow [`DirectoryStore`] boundary rather than a third-party
//! network API. Its failure surface is limited to transient connectivity and
//! authorization failures, and it never degrades: fabricating users or lists
//! would be worse than surfacing the error.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::SearchProvider;
use crate::error::{ProviderError, ProviderResult};
use crate::model::{placeholder_image, CanonicalSearchResult, ResultKind};
use crate::query::SearchQuery;

const KINDS: [ResultKind; 2] = [ResultKind::User, ResultKind::List];

/// A user row as returned by the internal store.
#[derive(Debug, Clone)]
pub struct UserSummary {
    pub id: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// A public list row as returned by the internal store.
#[derive(Debug, Clone)]
pub struct ListSummary {
    pub id: String,
    pub title: String,
    pub cover_url: Option<String>,
    pub item_count: u32,
}

/// Failure surface of the internal store.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
    #[error("directory access denied")]
    Unauthorized,
}

/// Narrow read interface onto the internal user/list store.
///
/// The persistent store itself (CRUD, comments, likes) is out of scope; this
/// core only ever reads through these two operations.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn find_users_by_name(&self, text: &str) -> Result<Vec<UserSummary>, DirectoryError>;
    async fn find_public_lists_by_title(
        &self,
        text: &str,
    ) -> Result<Vec<ListSummary>, DirectoryError>;
}

/// Adapter exposing the internal directory as a [`SearchProvider`].
pub struct DirectoryProvider {
    store: Arc<dyn DirectoryStore>,
}

impl DirectoryProvider {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    fn canonical_user(user: UserSummary) -> CanonicalSearchResult {
        let image_url = user
            .avatar_url
            .unwrap_or_else(|| placeholder_image(&user.display_name));
        CanonicalSearchResult {
            id: CanonicalSearchResult::qualified_id("directory", ResultKind::User, &user.id),
            title: user.display_name,
            image_url,
            kind: ResultKind::User,
            year: None,
            description: None,
            degraded: false,
            provider_meta: json!({ "user_id": user.id }),
        }
    }

    fn canonical_list(list: ListSummary) -> CanonicalSearchResult {
        let image_url = list.cover_url.unwrap_or_else(|| placeholder_image(&list.title));
        CanonicalSearchResult {
            id: CanonicalSearchResult::qualified_id("directory", ResultKind::List, &list.id),
            title: list.title,
            image_url,
            kind: ResultKind::List,
            year: None,
            description: Some(format!("{} items", list.item_count)),
            degraded: false,
            provider_meta: json!({ "list_id": list.id }),
        }
    }
}

impl From<DirectoryError> for ProviderError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Unavailable(msg) => ProviderError::NetworkUnavailable(msg),
            DirectoryError::Unauthorized => ProviderError::AuthFailure,
        }
    }
}

#[async_trait]
impl SearchProvider for DirectoryProvider {
    fn id(&self) -> &'static str {
        "directory"
    }

    fn kinds(&self) -> &'static [ResultKind] {
        &KINDS
    }

    fn is_available(&self) -> bool {
        true
    }

    // supports_degradation stays false: directory failures surface as errors.

    async fn execute(&self, query: &SearchQuery) -> ProviderResult<Vec<CanonicalSearchResult>> {
        let text = &query.normalized_text;
        let mut results = Vec::new();

        if query.scope.includes(ResultKind::User) {
            let users = self.store.find_users_by_name(text).await?;
            results.extend(users.into_iter().map(Self::canonical_user));
        }
        if query.scope.includes(ResultKind::List) {
            let lists = self.store.find_public_lists_by_title(text).await?;
            results.extend(lists.into_iter().map(Self::canonical_list));
        }
        Ok(results)
    }
}
