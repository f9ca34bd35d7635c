use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use actix_web::http::StatusCode;
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tabrecon_core::Error;
use tabrecon_reconcile::{ReconcileService, RequestOrigin, SuggestKind, TableRegistry};
use tracing::{debug, error};

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORM_LIMIT: usize = 4 * 1024 * 1024;

#[derive(Deserialize, Default)]
struct ReconcileParams {
    queries: Option<String>,
    extend: Option<String>,
}

impl ReconcileParams {
    /// Body parameters take precedence over the query string
    fn merge(self, body: Option<ReconcileParams>) -> ReconcileParams {
        let body = body.unwrap_or_default();
        ReconcileParams {
            queries: body.queries.or(self.queries),
            extend: body.extend.or(self.extend),
        }
    }
}

#[derive(Deserialize)]
struct ProposeParams {
    #[serde(rename = "type")]
    type_id: Option<String>,
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct SuggestParams {
    #[serde(default)]
    prefix: String,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct ServiceInfo {
    name: &'static str,
    version: &'static str,
    tables: Vec<String>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(registry: Arc<TableRegistry>, host: &str, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            App::new()
                .wrap(Self::cors())
                .wrap(Self::open_origin())
                .app_data(web::Data::new(registry.clone()))
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    }

    /// Preflight handling for cross-origin reconciliation clients
    pub fn cors() -> Cors {
        Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .send_wildcard()
            .max_age(3600)
    }

    /// `Access-Control-Allow-Origin: *` on every response, including errors
    /// and requests without an `Origin` header
    pub fn open_origin() -> DefaultHeaders {
        DefaultHeaders::new().add((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
    }
}

/// Register the reconciliation routes. Expects `web::Data<Arc<TableRegistry>>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::FormConfig::default()
            .limit(FORM_LIMIT)
            .error_handler(|err, _req| {
                let response = error_response(&Error::BadRequest(err.to_string()));
                InternalError::from_response(err, response).into()
            }),
    )
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let response = error_response(&Error::BadRequest(err.to_string()));
        InternalError::from_response(err, response).into()
    }))
    .route("/", web::get().to(service_info))
    .route("/{table:.+}/-/reconcile/extend/propose", web::get().to(propose_properties))
    .route("/{table:.+}/-/reconcile/suggest/{kind}", web::get().to(suggest))
    .route("/{table:.+}/-/reconcile", web::get().to(reconcile_get))
    .route("/{table:.+}/-/reconcile", web::post().to(reconcile_post));
}

/// Map an error to its JSON response
pub fn error_response(e: &Error) -> HttpResponse {
    let status = match e {
        Error::NotConfigured(_) => StatusCode::NOT_FOUND,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(error = %e, "request failed");
    }
    HttpResponse::build(status).json(serde_json::json!({
        "error": e.to_string()
    }))
}

fn respond<T: Serialize>(result: tabrecon_core::Result<T>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => error_response(&e),
    }
}

fn lookup(registry: &TableRegistry, table: &str) -> Result<Arc<ReconcileService>, HttpResponse> {
    registry.get(table).map_err(|e| error_response(&e))
}

fn request_origin(req: &HttpRequest) -> RequestOrigin {
    let forwarded = req
        .headers()
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok());
    let info = req.connection_info();
    RequestOrigin::from_request(forwarded, info.scheme(), info.host())
}

async fn service_info(registry: web::Data<Arc<TableRegistry>>) -> HttpResponse {
    HttpResponse::Ok().json(ServiceInfo {
        name: "tabrecon",
        version: env!("CARGO_PKG_VERSION"),
        tables: registry.list_tables(),
    })
}

async fn reconcile_get(
    registry: web::Data<Arc<TableRegistry>>,
    path: web::Path<String>,
    req: HttpRequest,
    params: web::Query<ReconcileParams>,
) -> HttpResponse {
    dispatch(&registry, &path.into_inner(), &req, params.into_inner()).await
}

async fn reconcile_post(
    registry: web::Data<Arc<TableRegistry>>,
    path: web::Path<String>,
    req: HttpRequest,
    params: web::Query<ReconcileParams>,
    form: Option<web::Form<ReconcileParams>>,
) -> HttpResponse {
    let params = params.into_inner().merge(form.map(web::Form::into_inner));
    dispatch(&registry, &path.into_inner(), &req, params).await
}

async fn dispatch(registry: &TableRegistry, table: &str, req: &HttpRequest, params: ReconcileParams) -> HttpResponse {
    let service = match lookup(registry, table) {
        Ok(s) => s,
        Err(response) => return response,
    };

    if let Some(queries) = params.queries {
        debug!(table, "reconcile query batch");
        respond(service.reconcile(&queries).await)
    } else if let Some(extend) = params.extend {
        debug!(table, "extend request");
        respond(service.extend(&extend).await)
    } else {
        respond(service.manifest(&request_origin(req)).await)
    }
}

async fn propose_properties(
    registry: web::Data<Arc<TableRegistry>>,
    path: web::Path<String>,
    params: web::Query<ProposeParams>,
) -> HttpResponse {
    let service = match lookup(&registry, &path.into_inner()) {
        Ok(s) => s,
        Err(response) => return response,
    };
    respond(service.propose_properties(params.type_id.as_deref(), params.limit).await)
}

async fn suggest(
    registry: web::Data<Arc<TableRegistry>>,
    path: web::Path<(String, String)>,
    params: web::Query<SuggestParams>,
) -> HttpResponse {
    let (table, kind) = path.into_inner();
    let service = match lookup(&registry, &table) {
        Ok(s) => s,
        Err(response) => return response,
    };
    let kind = match kind.parse::<SuggestKind>() {
        Ok(k) => k,
        Err(e) => return error_response(&e),
    };
    respond(service.suggest(kind, &params.prefix, params.limit).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::MessageBody, dev::ServiceResponse, test};
    use serde_json::Value;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tabrecon_core::{Column, ColumnType, DataSource, Result, Row, ServiceLimits, TableSettings};
    use tabrecon_similarity::Matcher;
    use tabrecon_storage::MemoryTable;

    fn dogs() -> MemoryTable {
        let columns = vec![
            Column::new("id", ColumnType::Int),
            Column::new("name", ColumnType::String),
            Column::new("age", ColumnType::Int),
            Column::new("status", ColumnType::String),
        ];
        let rows = [
            (1, "Cleo", 5, "good dog"),
            (2, "Pancakes", 4, "bad dog"),
            (3, "Fido", 3, "bad dog"),
            (4, "Scratchy", 3, "good dog"),
        ]
        .into_iter()
        .map(|(id, name, age, status)| {
            Row::new(id.to_string())
                .with_value("id", id)
                .with_value("name", name)
                .with_value("age", age)
                .with_value("status", status)
        })
        .collect();
        MemoryTable::new(columns, rows).unwrap()
    }

    /// Lists the dogs columns, fails every row lookup
    struct UnreachableSource;

    fn unreachable_source() -> Error {
        Error::DataSourceUnavailable("connection refused".to_string())
    }

    #[async_trait]
    impl DataSource for UnreachableSource {
        async fn list_columns(&self) -> Result<Vec<Column>> {
            dogs().list_columns().await
        }

        async fn row_count(&self) -> Result<usize> {
            Err(unreachable_source())
        }

        async fn get_row(&self, _: &str) -> Result<Option<Row>> {
            Err(unreachable_source())
        }

        async fn search_by_name(&self, _: &str, _: &str, _: usize) -> Result<Vec<Row>> {
            Err(unreachable_source())
        }

        async fn search_name_prefix(&self, _: &str, _: &str, _: usize) -> Result<Vec<Row>> {
            Err(unreachable_source())
        }

        async fn get_rows(&self, _: &[String], _: &[String]) -> Result<HashMap<String, Row>> {
            Err(unreachable_source())
        }
    }

    async fn registry() -> Arc<TableRegistry> {
        let limits = ServiceLimits {
            max_batch_size: 3,
            ..ServiceLimits::default()
        };
        let registry = Arc::new(TableRegistry::new(Matcher::default(), limits));
        registry
            .register_table(TableSettings::new("test/dogs", "name"), Arc::new(dogs()))
            .await
            .unwrap();
        registry
            .register_table(TableSettings::new("test/down", "name"), Arc::new(UnreachableSource))
            .await
            .unwrap();
        registry
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .wrap(RestApi::cors())
                    .wrap(RestApi::open_origin())
                    .app_data(web::Data::new(registry().await))
                    .configure(configure),
            )
            .await
        };
    }

    fn assert_open_cors<B: MessageBody>(response: &ServiceResponse<B>) {
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    async fn json_body<B: MessageBody>(response: ServiceResponse<B>) -> Value {
        let bytes = test::read_body(response).await;
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_not_configured_is_404() {
        let app = app!();
        let req = test::TestRequest::get().uri("/test/cats/-/reconcile").to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_open_cors(&response);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("test/cats"));
    }

    #[actix_web::test]
    async fn test_manifest_without_queries() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/test/dogs/-/reconcile")
            .insert_header(("host", "localhost"))
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_open_cors(&response);

        let body = json_body(response).await;
        assert_eq!(body["defaultTypes"][0]["id"], "object");
        assert_eq!(body["view"]["url"], "http://localhost/test/dogs/{{id}}");
        assert_eq!(
            body["extend"]["propose_properties"]["service_url"],
            "http://localhost/test/dogs/-/reconcile"
        );
        assert_eq!(body["extend"]["property_settings"][3]["name"], "status");
        assert_eq!(body["suggest"].as_object().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn test_manifest_follows_forwarded_proto() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/test/dogs/-/reconcile")
            .insert_header(("host", "localhost"))
            .insert_header(("x-forwarded-proto", "https"))
            .to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert_eq!(body["view"]["url"], "https://localhost/test/dogs/{{id}}");
    }

    #[actix_web::test]
    async fn test_queries_post_form() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/test/dogs/-/reconcile")
            .set_form([("queries", r#"{"q0": {"query": "fido"}}"#)])
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_open_cors(&response);

        let body = json_body(response).await;
        let result = body["q0"]["result"].as_array().unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["id"], "3");
        assert_eq!(result[0]["name"], "Fido");
        assert_eq!(result[0]["score"], 100.0);
        assert_eq!(result[0]["match"], true);
        assert_eq!(result[0]["type"], serde_json::json!([{"id": "object", "name": "Object"}]));
    }

    #[actix_web::test]
    async fn test_queries_get_no_results() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/test/dogs/-/reconcile?queries=%7B%22q0%22%3A%7B%22query%22%3A%22abcdef%22%7D%7D")
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["q0"]["result"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn test_malformed_queries_is_400() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/test/dogs/-/reconcile")
            .set_form([("queries", "{oops")])
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_open_cors(&response);
        let body = json_body(response).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_batch_too_large_is_400() {
        let app = app!();
        let queries = r#"{"a": {"query": "x"}, "b": {"query": "y"}, "c": {"query": "z"}, "d": {"query": "w"}}"#;
        let req = test::TestRequest::post()
            .uri("/test/dogs/-/reconcile")
            .set_form([("queries", queries)])
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("at most 3"));
    }

    #[actix_web::test]
    async fn test_extend_post() {
        let app = app!();
        let extend = r#"{"ids": ["1", "2", "3", "4", "99"], "properties": [{"id": "status"}, {"id": "age"}, {"id": "colour"}]}"#;
        let req = test::TestRequest::post()
            .uri("/test/dogs/-/reconcile")
            .set_form([("extend", extend)])
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_open_cors(&response);

        let body = json_body(response).await;
        assert_eq!(body["meta"].as_array().unwrap().len(), 2);
        assert_eq!(body["meta"][0]["id"], "status");
        assert_eq!(body["rows"]["1"]["status"], serde_json::json!([{"str": "good dog"}]));
        assert_eq!(body["rows"]["1"]["age"], serde_json::json!([{"int": 5}]));
        assert_eq!(body["rows"]["3"]["status"][0]["str"], "bad dog");
        assert_eq!(body["rows"]["99"]["age"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn test_propose_properties() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/test/dogs/-/reconcile/extend/propose?type=object")
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_open_cors(&response);
        let body = json_body(response).await;
        let properties = body["properties"].as_array().unwrap();
        assert_eq!(properties.len(), 4);
        assert_eq!(properties[3]["id"], "status");
        assert_eq!(properties[3]["name"], "status");
    }

    #[actix_web::test]
    async fn test_suggest_endpoints() {
        let app = app!();

        let req = test::TestRequest::get()
            .uri("/test/dogs/-/reconcile/suggest/entity?prefix=f")
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_open_cors(&response);
        let body = json_body(response).await;
        assert_eq!(body["result"][0]["id"], "3");
        assert_eq!(body["result"][0]["name"], "Fido");

        let req = test::TestRequest::get()
            .uri("/test/dogs/-/reconcile/suggest/property?prefix=a")
            .to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert_eq!(body["result"][0]["id"], "age");

        let req = test::TestRequest::get()
            .uri("/test/dogs/-/reconcile/suggest/type?prefix=a")
            .to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert_eq!(body["result"], serde_json::json!([]));

        let req = test::TestRequest::get()
            .uri("/test/dogs/-/reconcile/suggest/flyout?prefix=a")
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_service_info_lists_tables() {
        let app = app!();
        let req = test::TestRequest::get().uri("/").to_request();
        let body = json_body(test::call_service(&app, req).await).await;
        assert_eq!(body["tables"], serde_json::json!(["test/dogs", "test/down"]));
    }

    #[actix_web::test]
    async fn test_invalid_query_parameter_is_json_400() {
        let app = app!();
        for uri in [
            "/test/dogs/-/reconcile/suggest/entity?prefix=f&limit=abc",
            "/test/dogs/-/reconcile/extend/propose?limit=-1",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let response = test::call_service(&app, req).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            assert_open_cors(&response);
            let body = json_body(response).await;
            assert!(body["error"].is_string(), "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_source_failure_is_500() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/test/down/-/reconcile")
            .set_form([("queries", r#"{"q0": {"query": "fido"}, "q1": {"query": "cleo"}}"#)])
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_open_cors(&response);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("connection refused"));
        assert!(body.get("q0").is_none());

        let req = test::TestRequest::get()
            .uri("/test/down/-/reconcile/suggest/entity?prefix=f")
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_open_cors(&response);
    }

    #[actix_web::test]
    async fn test_every_route_404s_for_unknown_table() {
        let app = app!();
        for uri in [
            "/test/cats/-/reconcile?queries=%7B%7D",
            "/test/cats/-/reconcile/extend/propose",
            "/test/cats/-/reconcile/suggest/entity?prefix=f",
            "/test/cats/-/reconcile/suggest/property?prefix=a",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let response = test::call_service(&app, req).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
            assert_open_cors(&response);
            let body = json_body(response).await;
            assert!(body["error"].as_str().unwrap().contains("test/cats"), "{}", uri);
        }
    }
}
