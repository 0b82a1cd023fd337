use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Analista,
    Observador,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Analista, Role::Observador];

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Analista => "Analista",
            Role::Observador => "Observador",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Pendiente,
    Activo,
    Inactivo,
    Rechazado,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Pendiente => "PENDIENTE",
            UserStatus::Activo => "ACTIVO",
            UserStatus::Inactivo => "INACTIVO",
            UserStatus::Rechazado => "RECHAZADO",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "usuarioID")]
    pub id: i64,
    pub nombre: String,
    pub email: String,
    pub rol: Option<Role>,
    pub estado: UserStatus,
}

/// Mutations available on the users page.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Approve(Role),
    Reject,
    ChangeRole(Role),
    Deactivate,
    Reactivate,
}
