//! Provider service descriptors.

/// How to reach and address a JSON-protocol service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceEndpoint {
    /// Signing name; also the endpoint subdomain.
    pub signing_name: &'static str,
    /// Prefix of the `x-amz-target` header (`{prefix}.{Operation}`).
    pub target_prefix: &'static str,
    /// Request content type.
    pub content_type: &'static str,
}

impl ServiceEndpoint {
    pub const REKOGNITION: ServiceEndpoint = ServiceEndpoint {
        signing_name: "rekognition",
        target_prefix: "RekognitionService",
        content_type: "application/x-amz-json-1.1",
    };

    pub const TEXTRACT: ServiceEndpoint = ServiceEndpoint {
        signing_name: "textract",
        target_prefix: "Textract",
        content_type: "application/x-amz-json-1.1",
    };

    pub const STEP_FUNCTIONS: ServiceEndpoint = ServiceEndpoint {
        signing_name: "states",
        target_prefix: "AWSStepFunctions",
        content_type: "application/x-amz-json-1.0",
    };

    pub const DYNAMODB: ServiceEndpoint = ServiceEndpoint {
        signing_name: "dynamodb",
        target_prefix: "DynamoDB_20120810",
        content_type: "application/x-amz-json-1.0",
    };

    /// `x-amz-target` value for an operation.
    pub fn target(&self, operation: &str) -> String {
        format!("{}.{}", self.target_prefix, operation)
    }
}
