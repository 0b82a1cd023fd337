use pretty_assertions::assert_eq;
use seedlab_backend::{
    api::{ApiClient, analysis, catalogs, lotes},
    error::ApiError,
    notifications::NotificationApi,
    validation::forms::build_catalog_request,
};
use seedlab_bridge::{
    catalog::{CatalogEntry, CatalogType, EntityForm, EntityKind},
    page::ListQuery,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::with_client(reqwest::Client::new(), &server.uri(), Some("token-1".to_owned()))
        .unwrap()
}

#[tokio::test]
async fn humedad_entry_is_created_and_listed_as_active() {
    let server = MockServer::start().await;
    let created = json!({ "id": 11, "tipo": "HUMEDAD", "valor": "12%", "activo": true });

    Mock::given(method("POST"))
        .and(path("/api/catalogo"))
        .and(header("authorization", "Bearer token-1"))
        .and(body_json(json!({ "tipo": "HUMEDAD", "valor": "12%" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/catalogo/listado"))
        .and(query_param("tipo", "HUMEDAD"))
        .and(query_param("activo", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [created],
            "totalElements": 1,
            "totalPages": 1,
            "number": 0
        })))
        .mount(&server)
        .await;

    let api = client(&server);
    let request = build_catalog_request(&EntityForm::Lookup {
        tipo: CatalogType::Humedad,
        valor: " 12% ".to_owned(),
    })
    .unwrap();
    let entry = catalogs::save_entry(&api, None, &request).await.unwrap();
    assert!(entry.active());

    let kind = EntityKind::Lookup(CatalogType::Humedad);
    let page = catalogs::list_entries(&api, kind, &ListQuery::default(), 10)
        .await
        .unwrap();
    assert_eq!(page.content.len(), 1);
    assert!(page.first && page.last);
    match &page.content[0] {
        CatalogEntry::Lookup(item) => {
            assert_eq!(item.valor, "12%");
            assert!(item.activo);
        }
        other => panic!("unexpected entry {other:?}"),
    }
}

#[tokio::test]
async fn lote_deactivation_and_reactivation() {
    let server = MockServer::start().await;
    let lote = |activo: bool| {
        json!({
            "loteID": 5,
            "ficha": "L-005",
            "activo": activo,
            "tiposAnalisisAsignados": ["GERMINACION"]
        })
    };
    Mock::given(method("GET"))
        .and(path("/api/lotes/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lote(true)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/lotes/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/lotes/5/reactivar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lote(true)))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let before = lotes::get_lote(&api, 5).await.unwrap();
    assert!(before.activo);

    lotes::deactivate_lote(&api, 5).await.unwrap();
    Mock::given(method("GET"))
        .and(path("/api/lotes/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lote(false)))
        .expect(1)
        .mount(&server)
        .await;
    let deactivated = lotes::get_lote(&api, 5).await.unwrap();
    assert!(!deactivated.activo);

    let reactivated = lotes::reactivate_lote(&api, 5).await.unwrap();
    assert!(reactivated.activo);
    assert_eq!((before.id, deactivated.id, reactivated.id), (5, 5, 5));
    assert_eq!(
        [before.activo, deactivated.activo, reactivated.activo],
        [true, false, true]
    );
}

#[tokio::test]
async fn missing_repetitions_are_an_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tetrazolios/9/repeticiones"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let repetitions = analysis::tetrazolio_repetitions(&client(&server), 9)
        .await
        .unwrap();
    assert!(repetitions.is_empty());
}

#[tokio::test]
async fn server_message_reaches_the_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/lotes"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "La ficha ya existe" })),
        )
        .mount(&server)
        .await;

    let error = lotes::create_lote(&client(&server), &Default::default())
        .await
        .unwrap_err();
    assert!(matches!(error, ApiError::Status { status: 409, .. }));
    assert_eq!(error.user_message(), "La ficha ya existe");
}

#[tokio::test]
async fn notification_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notificaciones/mis-notificaciones"))
        .and(query_param("page", "1"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{
                "id": 40,
                "nombre": "Análisis para repetir",
                "mensaje": "El tetrazolio del lote L-2 debe repetirse",
                "tipo": "ANALISIS_REPETIR",
                "leido": false,
                "fechaCreacion": "2025-03-02T08:00:00Z",
                "analisisId": 12
            }],
            "page": { "number": 1, "size": 10, "totalElements": 11, "totalPages": 2 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/notificaciones/mis-notificaciones/no-leidas/contador"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(7)))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/notificaciones/40/marcar-leida"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/notificaciones/40"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let page = api.fetch_page(1, 10).await.unwrap();
    assert_eq!(page.number, 1);
    assert_eq!(page.total_pages, 2);
    assert!(page.last);
    assert_eq!(page.content[0].analysis_id, Some(12));

    assert_eq!(NotificationApi::unread_count(&api).await.unwrap(), 7);
    api.mark_as_read(40).await.unwrap();
    NotificationApi::delete(&api, 40).await.unwrap();
}
