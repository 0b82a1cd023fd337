use seedlab_bridge::{
    MessageFromBackend, PageKind,
    notification::ToastKind,
    page::ListQuery,
    user::{UserAction, UserStatus},
};

use super::AppContextHandle;
use crate::api::users;

pub async fn handle_list_request(
    context: AppContextHandle,
    query: ListQuery,
    status: Option<UserStatus>,
) {
    {
        let mut state = context.state.write().await;
        state.last_users = Some((query.clone(), status));
    }
    load(&context, &query, status).await;
}

async fn load(context: &AppContextHandle, query: &ListQuery, status: Option<UserStatus>) {
    let (api, size) = (context.api().await, context.page_size().await);
    match users::list_users(&api, query, status, size).await {
        Ok(page) => {
            context
                .send(MessageFromBackend::UsersListResponse(page))
                .await;
        }
        Err(e) => {
            context
                .report_load_failure(PageKind::Users, &e.into())
                .await;
        }
    }
}

pub async fn handle_pending_request(context: AppContextHandle) {
    let api = context.api().await;
    match users::pending_users(&api).await {
        Ok(pending) => {
            context
                .send(MessageFromBackend::PendingUsersResponse(pending))
                .await;
        }
        Err(e) => context.report(&e.into()).await,
    }
}

fn success_message(action: &UserAction, nombre: &str) -> String {
    match action {
        UserAction::Approve(rol) => format!("{nombre} fue aprobado como {}.", rol.label()),
        UserAction::Reject => format!("Se rechazó la solicitud de {nombre}."),
        UserAction::ChangeRole(rol) => format!("{nombre} ahora es {}.", rol.label()),
        UserAction::Deactivate => format!("{nombre} fue desactivado."),
        UserAction::Reactivate => format!("{nombre} fue reactivado."),
    }
}

/// Applies an approval, rejection, role change or (de)activation, then
/// refreshes both the table and the pending list.
pub async fn handle_action(context: AppContextHandle, id: i64, action: UserAction) {
    let api = context.api().await;
    match users::apply_user_action(&api, id, &action).await {
        Ok(user) => {
            log::info!("Applied {action:?} to user {id}");
            context
                .send_toast(ToastKind::Success, success_message(&action, &user.nombre))
                .await;

            let last = context.state.read().await.last_users.clone();
            if let Some((query, status)) = last {
                load(&context, &query, status).await;
            }
            handle_pending_request(context).await;
        }
        Err(e) => context.report(&e.into()).await,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use seedlab_bridge::user::Role;

    use super::*;

    #[test]
    fn messages_name_the_user() {
        assert_eq!(
            success_message(&UserAction::Approve(Role::Analista), "Ana"),
            "Ana fue aprobado como Analista."
        );
        assert_eq!(
            success_message(&UserAction::Reject, "Luis"),
            "Se rechazó la solicitud de Luis."
        );
    }
}
