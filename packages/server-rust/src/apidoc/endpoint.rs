//! Endpoint descriptors collected at wiring time.

use std::fmt;

use http::Method;
use serde::Serialize;
use strata_core::{Reflect, SchemaNode};

/// Primitive type of a query or multipart parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    /// Multipart upload; not meaningful for query parameters.
    File,
}

impl ParamType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::File => "file",
        }
    }
}

/// A query-string parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    pub required: bool,
}

impl QueryParam {
    #[must_use]
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: String::new(),
            required: false,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A `multipart/form-data` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartParam {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    pub required: bool,
}

impl MultipartParam {
    #[must_use]
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: String::new(),
            required: false,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Example payload returned with a status code.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleResponse {
    pub status: u16,
    pub content: serde_json::Value,
}

/// Deferred schema of a request body type.
///
/// Only the describing function is stored; the schema is derived each time a
/// document is generated.
#[derive(Clone, Copy)]
pub struct BodyType {
    type_name: &'static str,
    schema: fn() -> SchemaNode,
}

impl BodyType {
    #[must_use]
    pub fn of<T: Reflect>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            schema: T::schema,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn schema(&self) -> SchemaNode {
        (self.schema)()
    }
}

impl fmt::Debug for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BodyType").field(&self.type_name).finish()
    }
}

/// Documentation metadata of one HTTP endpoint.
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    pub method: Method,
    /// URL template; `{name}` segments are path parameters.
    pub url: String,
    pub body: Option<BodyType>,
    pub query_params: Vec<QueryParam>,
    pub multipart_params: Vec<MultipartParam>,
    pub summary: String,
    pub description: String,
    pub tag: String,
    pub examples: Vec<ExampleResponse>,
}

impl EndpointDescriptor {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            query_params: Vec::new(),
            multipart_params: Vec::new(),
            summary: String::new(),
            description: String::new(),
            tag: String::new(),
            examples: Vec::new(),
        }
    }

    /// Documents `T` as the JSON request body.
    #[must_use]
    pub fn body<T: Reflect>(mut self) -> Self {
        self.body = Some(BodyType::of::<T>());
        self
    }

    #[must_use]
    pub fn query(mut self, param: QueryParam) -> Self {
        self.query_params.push(param);
        self
    }

    #[must_use]
    pub fn multipart(mut self, param: MultipartParam) -> Self {
        self.multipart_params.push(param);
        self
    }

    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    #[must_use]
    pub fn example(mut self, status: u16, content: serde_json::Value) -> Self {
        self.examples.push(ExampleResponse { status, content });
        self
    }

    /// `"<METHOD> <url>"`, e.g. `"POST /api/users/{id}"`.
    #[must_use]
    pub fn method_url(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// Names of the `{param}` segments of the URL template, in order.
    #[must_use]
    pub fn path_params(&self) -> Vec<&str> {
        self.url
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use strata_core::reflect;

    use super::*;

    struct Login {
        email: String,
    }

    reflect!(Login { email: String });

    #[test]
    fn builder_collects_metadata() {
        let endpoint = EndpointDescriptor::new(Method::POST, "/api/login")
            .body::<Login>()
            .query(QueryParam::new("redirect", ParamType::String).description("Return URL"))
            .summary("Log in")
            .tag("Auth")
            .example(200, json!({"token": "abc"}));

        assert_eq!(endpoint.method_url(), "POST /api/login");
        assert_eq!(endpoint.query_params.len(), 1);
        assert!(!endpoint.query_params[0].required);
        assert_eq!(endpoint.query_params[0].description, "Return URL");
        assert_eq!(endpoint.examples[0].status, 200);
        let body = endpoint.body.unwrap();
        assert!(body.type_name().ends_with("Login"));
        assert_eq!(
            body.schema().properties().unwrap()["email"],
            SchemaNode::String
        );
    }

    #[test]
    fn path_params_are_brace_delimited_segments() {
        let endpoint = EndpointDescriptor::new(Method::GET, "/api/orgs/{org}/users/{id}/avatar");
        assert_eq!(endpoint.path_params(), vec!["org", "id"]);

        let partial = EndpointDescriptor::new(Method::GET, "/api/{}/file.{ext}/x{y}");
        assert!(partial.path_params().is_empty());
    }

    #[test]
    fn param_type_names() {
        assert_eq!(ParamType::Integer.as_str(), "integer");
        assert_eq!(
            serde_json::to_value(ParamType::File).unwrap(),
            json!("file")
        );
    }
}
