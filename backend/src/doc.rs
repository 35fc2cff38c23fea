//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together with
//! the request, response and error schemas they reference. The document backs
//! Swagger UI in debug builds and is exported by `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, PriceSource, QueryIntent, UserId};
use crate::inbound::http::ask::{AskKuberRequest, AskKuberResponse, PriceBody, TrendBody};
use crate::inbound::http::health::StatusBody;
use crate::inbound::http::holdings::HoldingsResponse;
use crate::inbound::http::purchase::{BuyGoldRequest, BuyGoldResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "KuberAI API",
        description = "Gold investment advisor and digital gold purchase simulator."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::ask::ask_kuber,
        crate::inbound::http::purchase::buy_gold,
        crate::inbound::http::holdings::holdings,
        crate::inbound::http::health::status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        AskKuberRequest,
        AskKuberResponse,
        PriceBody,
        TrendBody,
        PriceSource,
        QueryIntent,
        BuyGoldRequest,
        BuyGoldResponse,
        HoldingsResponse,
        UserId,
        StatusBody,
    )),
    tags(
        (name = "advisor", description = "Conversational gold investment advice"),
        (name = "purchases", description = "Digital gold purchases and holdings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/ask-kuber")]
    #[case("/buy-gold")]
    #[case("/holdings/{email}")]
    #[case("/")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn document_lists_every_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("AskKuberResponse", "isGoldQuery")]
    #[case("AskKuberResponse", "extraInsights")]
    #[case("BuyGoldRequest", "quotedPriceInrPerGram")]
    #[case("BuyGoldResponse", "totalGramsOwned")]
    #[case("HoldingsResponse", "transactionCount")]
    fn schemas_use_camel_case_fields(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");

        assert_object_schema_has_field(schema, field);
    }
}
