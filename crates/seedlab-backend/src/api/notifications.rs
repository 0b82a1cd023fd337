use async_trait::async_trait;
use serde_json::Value;
use seedlab_bridge::{notification::Notification, page::Page};

use super::{
    ApiClient,
    pagination::{PageQuery, extract_page},
};
use crate::{error::ApiError, notifications::NotificationApi};

pub async fn list_notifications(
    client: &ApiClient,
    page: u32,
    size: u32,
) -> Result<Page<Notification>, ApiError> {
    let query = PageQuery::new(page, size);
    let value = client
        .get_json::<Value>("/api/notificaciones/mis-notificaciones", query.as_pairs())
        .await?;
    extract_page(value)
}

/// The server's count of unread notifications across every page.
pub async fn unread_count(client: &ApiClient) -> Result<u64, ApiError> {
    let value = client
        .get_json::<Value>("/api/notificaciones/mis-notificaciones/no-leidas/contador", &[])
        .await?;
    parse_count(&value).ok_or_else(|| {
        ApiError::Decode(<serde_json::Error as serde::de::Error>::custom(format!(
            "expected an unread count, got {value}"
        )))
    })
}

/// The counter comes either as a bare number or wrapped in an object.
pub(crate) fn parse_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::Object(map) => ["count", "contador", "noLeidas"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_u64)),
        _ => None,
    }
}

#[async_trait]
impl NotificationApi for ApiClient {
    async fn fetch_page(&self, page: u32, size: u32) -> Result<Page<Notification>, ApiError> {
        list_notifications(self, page, size).await
    }

    async fn unread_count(&self) -> Result<u64, ApiError> {
        unread_count(self).await
    }

    async fn mark_as_read(&self, id: i64) -> Result<(), ApiError> {
        self.put_no_content(&format!("/api/notificaciones/{id}/marcar-leida"))
            .await
    }

    async fn mark_all_as_read(&self) -> Result<(), ApiError> {
        self.put_no_content("/api/notificaciones/marcar-todas-leidas")
            .await
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        ApiClient::delete(self, &format!("/api/notificaciones/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn count_shapes() {
        assert_eq!(parse_count(&json!(4)), Some(4));
        assert_eq!(parse_count(&json!({ "count": 9 })), Some(9));
        assert_eq!(parse_count(&json!({ "contador": 2 })), Some(2));
        assert_eq!(parse_count(&json!("7")), None);
        assert_eq!(parse_count(&json!(-1)), None);
    }
}
