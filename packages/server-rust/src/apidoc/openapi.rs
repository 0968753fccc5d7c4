//! OpenAPI 3.0 document model.
//!
//! Only the subset the registry emits is modelled. Maps are `BTreeMap` so the
//! rendered document is byte-stable across runs.

use std::collections::BTreeMap;

use http::Method;
use serde::Serialize;
use strata_core::SchemaNode;

use super::endpoint::{EndpointDescriptor, MultipartParam, ParamType};

pub const OPENAPI_VERSION: &str = "3.0.0";

const JSON: &str = "application/json";
const MULTIPART: &str = "multipart/form-data";

/// Root of a generated document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    pub servers: Vec<Server>,
    /// URL template, then lowercase method.
    pub paths: BTreeMap<String, BTreeMap<String, Operation>>,
    pub components: Components,
    pub tags: Vec<Tag>,
}

impl OpenApiDocument {
    /// Renders the document as YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Info {
    pub title: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Server {
    pub url: String,
    pub description: String,
}

impl Server {
    #[must_use]
    pub fn api(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: "API server".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Components {
    #[serde(rename = "securitySchemes")]
    pub security_schemes: BTreeMap<String, SecurityScheme>,
}

impl Default for Components {
    fn default() -> Self {
        let mut security_schemes = BTreeMap::new();
        security_schemes.insert("bearerAuth".to_string(), SecurityScheme::bearer_jwt());
        Self { security_schemes }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub kind: String,
    pub scheme: String,
    #[serde(rename = "bearerFormat")]
    pub bearer_format: String,
}

impl SecurityScheme {
    #[must_use]
    pub fn bearer_jwt() -> Self {
        Self {
            kind: "http".to_string(),
            scheme: "bearer".to_string(),
            bearer_format: "JWT".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
}

/// One method on one path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Status code as a string, then response.
    pub responses: BTreeMap<String, Response>,
}

impl Operation {
    /// Builds the operation documenting `endpoint`.
    ///
    /// Path parameters come first, then query parameters. A multipart body
    /// wins over a JSON body, and a JSON body is never emitted for `GET`.
    #[must_use]
    pub fn from_endpoint(endpoint: &EndpointDescriptor) -> Self {
        let summary = if endpoint.summary.is_empty() {
            endpoint.method_url()
        } else {
            endpoint.summary.clone()
        };

        let parameters = endpoint
            .path_params()
            .into_iter()
            .map(Parameter::path)
            .chain(endpoint.query_params.iter().map(|param| Parameter {
                name: param.name.clone(),
                location: ParameterLocation::Query,
                description: Some(param.description.clone()),
                required: param.required,
                schema: ParamSchema {
                    kind: param.param_type,
                },
            }))
            .collect();

        let request_body = if endpoint.multipart_params.is_empty() {
            endpoint
                .body
                .filter(|_| endpoint.method != Method::GET)
                .map(|body| RequestBody::json(body.schema()))
        } else {
            Some(RequestBody::multipart(&endpoint.multipart_params))
        };

        let responses = if endpoint.examples.is_empty() {
            BTreeMap::from([(
                "200".to_string(),
                Response {
                    description: "Successful operation".to_string(),
                    content: None,
                },
            )])
        } else {
            endpoint
                .examples
                .iter()
                .map(|example| {
                    (
                        example.status.to_string(),
                        Response::example(example.status, example.content.clone()),
                    )
                })
                .collect()
        };

        Self {
            summary,
            description: non_empty(&endpoint.description),
            tags: non_empty(&endpoint.tag).into_iter().collect(),
            parameters,
            request_body,
            responses,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Always present on query parameters, empty or not; absent on path ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub schema: ParamSchema,
}

impl Parameter {
    fn path(name: &str) -> Self {
        Self {
            name: name.to_string(),
            location: ParameterLocation::Path,
            description: None,
            required: true,
            schema: ParamSchema {
                kind: ParamType::String,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamSchema {
    #[serde(rename = "type")]
    pub kind: ParamType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    pub content: BTreeMap<String, MediaType>,
}

impl RequestBody {
    fn json(schema: SchemaNode) -> Self {
        Self {
            content: BTreeMap::from([(JSON.to_string(), MediaType::schema(BodySchema::Json(schema)))]),
        }
    }

    fn multipart(params: &[MultipartParam]) -> Self {
        let properties = params
            .iter()
            .map(|param| (param.name.clone(), FormField::from(param)))
            .collect();
        let schema = BodySchema::Form(FormSchema {
            kind: "object",
            properties,
        });
        Self {
            content: BTreeMap::from([(MULTIPART.to_string(), MediaType::schema(schema))]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<BodySchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

impl MediaType {
    fn schema(schema: BodySchema) -> Self {
        Self {
            schema: Some(schema),
            example: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BodySchema {
    Json(SchemaNode),
    Form(FormSchema),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSchema {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub properties: BTreeMap<String, FormField>,
}

/// A multipart field. File uploads are arrays of binary strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<BinaryItems>,
    pub description: String,
}

impl From<&MultipartParam> for FormField {
    fn from(param: &MultipartParam) -> Self {
        match param.param_type {
            ParamType::File => Self {
                kind: "array",
                items: Some(BinaryItems::default()),
                description: param.description.clone(),
            },
            other => Self {
                kind: other.as_str(),
                items: None,
                description: param.description.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinaryItems {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub format: &'static str,
}

impl Default for BinaryItems {
    fn default() -> Self {
        Self {
            kind: "string",
            format: "binary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,
}

impl Response {
    fn example(status: u16, example: serde_json::Value) -> Self {
        Self {
            description: format!("Status {status} response"),
            content: Some(BTreeMap::from([(
                JSON.to_string(),
                MediaType {
                    schema: None,
                    example: Some(example),
                },
            )])),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
