use serde::Serialize;
use seedlab_bridge::{
    page::{ListQuery, Page},
    user::{Role, User, UserAction, UserStatus},
};

use super::{
    ApiClient,
    pagination::{PageQuery, extract_page},
};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
struct RoleBody {
    rol: Role,
}

pub async fn list_users(
    client: &ApiClient,
    query: &ListQuery,
    status: Option<UserStatus>,
    size: u32,
) -> Result<Page<User>, ApiError> {
    // Users are never soft-deleted; their lifecycle lives in `estado`.
    let page_query = PageQuery::new(query.page, size)
        .search(query.search.as_deref())
        .optional("estado", status.map(UserStatus::as_str));
    let value = client
        .get_json::<serde_json::Value>("/api/usuarios/listado", page_query.as_pairs())
        .await?;
    extract_page(value)
}

/// Registrations waiting for an administrator.
pub async fn pending_users(client: &ApiClient) -> Result<Vec<User>, ApiError> {
    client.get_json("/api/usuarios/pendientes", &[]).await
}

pub async fn apply_user_action(
    client: &ApiClient,
    id: i64,
    action: &UserAction,
) -> Result<User, ApiError> {
    match action {
        UserAction::Approve(rol) => {
            client
                .put_json(
                    &format!("/api/usuarios/{id}/aprobar"),
                    &RoleBody { rol: *rol },
                )
                .await
        }
        UserAction::Reject => client.put_empty(&format!("/api/usuarios/{id}/rechazar")).await,
        UserAction::ChangeRole(rol) => {
            client
                .put_json(&format!("/api/usuarios/{id}/rol"), &RoleBody { rol: *rol })
                .await
        }
        UserAction::Deactivate => {
            client
                .put_empty(&format!("/api/usuarios/{id}/desactivar"))
                .await
        }
        UserAction::Reactivate => {
            client
                .put_empty(&format!("/api/usuarios/{id}/reactivar"))
                .await
        }
    }
}
