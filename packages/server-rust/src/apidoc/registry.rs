//! Registry of documented HTTP endpoints.

use std::collections::{BTreeMap, BTreeSet};

use super::endpoint::EndpointDescriptor;
use super::openapi::{Components, Info, OpenApiDocument, Operation, Server, Tag, OPENAPI_VERSION};
use super::table;

pub const DEFAULT_TITLE: &str = "Strata API";
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Ordered collection of [`EndpointDescriptor`]s.
///
/// Filled while the application is wired, then handed to a publisher.
/// Nothing deduplicates: a later descriptor for the same method and URL
/// replaces the earlier one in the generated document.
#[derive(Debug, Clone)]
pub struct ApiRegistry {
    title: String,
    version: String,
    endpoints: Vec<EndpointDescriptor>,
}

impl Default for ApiRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::with_info(DEFAULT_TITLE, DEFAULT_VERSION)
    }

    #[must_use]
    pub fn with_info(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            endpoints: Vec::new(),
        }
    }

    /// Appends a descriptor.
    pub fn add(&mut self, endpoint: EndpointDescriptor) -> &mut Self {
        self.endpoints.push(endpoint);
        self
    }

    #[must_use]
    pub fn endpoints(&self) -> &[EndpointDescriptor] {
        &self.endpoints
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Builds the OpenAPI document for the current registrations.
    ///
    /// Pure: the same registry and `base_url` always yield the same document.
    #[must_use]
    pub fn generate_document(&self, base_url: &str) -> OpenApiDocument {
        let mut paths: BTreeMap<String, BTreeMap<String, Operation>> = BTreeMap::new();
        let mut tags = BTreeSet::new();

        for endpoint in &self.endpoints {
            if !endpoint.tag.is_empty() {
                tags.insert(endpoint.tag.clone());
            }
            paths.entry(endpoint.url.clone()).or_default().insert(
                endpoint.method.as_str().to_ascii_lowercase(),
                Operation::from_endpoint(endpoint),
            );
        }

        OpenApiDocument {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: self.title.clone(),
                version: self.version.clone(),
            },
            servers: vec![Server::api(base_url)],
            paths,
            components: Components::default(),
            tags: tags.into_iter().map(|name| Tag { name }).collect(),
        }
    }

    /// Fixed-width table of the registered endpoints, one per line.
    #[must_use]
    pub fn render_table(&self) -> String {
        const WIDTHS: [usize; 4] = [28, 40, 8, 40];
        let mut out = table::header(&["Tag", "Summary", "Method", "URL"], &WIDTHS);
        for endpoint in &self.endpoints {
            out.push_str(&table::row(
                &[
                    &endpoint.tag,
                    &endpoint.summary,
                    endpoint.method.as_str(),
                    &endpoint.url,
                ],
                &WIDTHS,
            ));
        }
        out
    }
}
