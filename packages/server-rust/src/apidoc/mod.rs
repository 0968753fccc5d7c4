//! API documentation: endpoint and topic registries, the documents generated
//! from them, and the HTTP routes that publish those documents.

pub mod endpoint;
pub mod openapi;
pub mod publish;
pub mod registry;
mod table;
pub mod topics;

pub use endpoint::{EndpointDescriptor, MultipartParam, ParamType, QueryParam};
pub use openapi::OpenApiDocument;
pub use publish::{openapi_router, topic_router, PublishError};
pub use registry::ApiRegistry;
pub use topics::{TopicDescriptor, TopicDocument, TopicRegistry};
