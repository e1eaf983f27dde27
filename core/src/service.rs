//! Per-service request shaping knobs.

/// Protocol dialect spoken by a service.
///
/// The dialect decides content negotiation and whether operations are
/// addressed through the `x-amz-target` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// The EC2 variant of the query protocol.
    Ec2,
    /// AWS JSON RPC. Operations are named via `x-amz-target`.
    Json,
    /// The query protocol used by older flat-parameter services.
    Query,
    /// RESTful routing with JSON payloads.
    RestJson,
    /// RESTful routing with XML payloads.
    RestXml,
}

/// Signing scheme a service requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningScheme {
    /// AWS Signature Version 4.
    V4,
    /// The legacy S3 scheme. Sending fails with a "not implemented" error.
    S3,
}

/// On-the-wire representation of timestamps in payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `2015-08-30T12:36:00Z`
    Iso8601,
    /// `Sun, 30 Aug 2015 12:36:00 GMT`
    Rfc822,
    /// Seconds since the epoch.
    UnixTimestamp,
}

/// Where a service lives: one global endpoint, or one endpoint per region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// A single endpoint for all callers. Signs as `us-east-1`.
    Global,
    /// An endpoint in the named region.
    Regional(String),
}

/// Host and signing-region resolution backend.
///
/// Alternate backends let a descriptor target S3-compatible vendors without
/// touching the rest of the pipeline. Plain `fn` pointers keep the
/// descriptor `Clone` and free of shared state.
#[derive(Debug, Clone, Copy)]
pub enum EndpointResolver {
    /// `<prefix>.amazonaws.com`, or `<prefix>.<region>.amazonaws.com`.
    Standard,
    /// `nyc3.digitaloceanspaces.com`, or `<region>.digitaloceanspaces.com`.
    DigitalOceanSpaces,
    /// Caller supplied resolution.
    Custom {
        /// Resolve the bare host (no scheme, no trailing slash) from the
        /// endpoint and the endpoint prefix.
        host: fn(&Endpoint, &str) -> String,
        /// Resolve the signing region from the endpoint.
        region: fn(&Endpoint) -> String,
    },
}

/// Immutable record of everything request shaping and signing need to know
/// about one service.
///
/// Descriptors are value types: every setter returns a new descriptor, and
/// clones can be shared freely across concurrent tasks.
///
/// ```
/// use awsreq_core::{Protocol, Service, SigningScheme};
///
/// let acm = Service::regional(
///     "acm",
///     "2015-12-08",
///     Protocol::Json,
///     SigningScheme::V4,
///     "ca-central-1",
/// );
/// assert_eq!(acm.host(), "acm.ca-central-1.amazonaws.com");
/// assert_eq!(acm.target_prefix(), "AWSACM_20151208");
/// ```
#[derive(Debug, Clone)]
pub struct Service {
    endpoint_prefix: String,
    api_version: String,
    protocol: Protocol,
    signer: SigningScheme,
    target_prefix: String,
    timestamp_format: TimestampFormat,
    json_version: Option<String>,
    signing_name: Option<String>,
    xml_namespace: Option<String>,
    endpoint: Endpoint,
    resolver: EndpointResolver,
}

impl Service {
    /// Define a service with a single global endpoint.
    pub fn global(
        endpoint_prefix: &str,
        api_version: &str,
        protocol: Protocol,
        signer: SigningScheme,
    ) -> Self {
        Self::define(endpoint_prefix, api_version, protocol, signer, Endpoint::Global)
    }

    /// Define a service bound to a region.
    pub fn regional(
        endpoint_prefix: &str,
        api_version: &str,
        protocol: Protocol,
        signer: SigningScheme,
        region: &str,
    ) -> Self {
        Self::define(
            endpoint_prefix,
            api_version,
            protocol,
            signer,
            Endpoint::Regional(region.to_string()),
        )
    }

    fn define(
        endpoint_prefix: &str,
        api_version: &str,
        protocol: Protocol,
        signer: SigningScheme,
        endpoint: Endpoint,
    ) -> Self {
        // Derived defaults live here so later setters override cleanly.
        let target_prefix = format!(
            "AWS{}_{}",
            endpoint_prefix.to_uppercase(),
            api_version.replace('-', "")
        );
        let timestamp_format = match protocol {
            Protocol::Json | Protocol::RestJson => TimestampFormat::UnixTimestamp,
            _ => TimestampFormat::Iso8601,
        };

        Self {
            endpoint_prefix: endpoint_prefix.to_string(),
            api_version: api_version.to_string(),
            protocol,
            signer,
            target_prefix,
            timestamp_format,
            json_version: None,
            signing_name: None,
            xml_namespace: None,
            endpoint,
            resolver: EndpointResolver::Standard,
        }
    }

    /// Set the JSON protocol version, switching the content type to
    /// `application/x-amz-json-<version>`.
    pub fn with_json_version(mut self, json_version: &str) -> Self {
        self.json_version = Some(json_version.to_string());
        self
    }

    /// Override the service name used in credential scopes and key
    /// derivation.
    pub fn with_signing_name(mut self, signing_name: &str) -> Self {
        self.signing_name = Some(signing_name.to_string());
        self
    }

    /// Override the derived target prefix.
    pub fn with_target_prefix(mut self, target_prefix: &str) -> Self {
        self.target_prefix = target_prefix.to_string();
        self
    }

    /// Override the derived timestamp format.
    pub fn with_timestamp_format(mut self, timestamp_format: TimestampFormat) -> Self {
        self.timestamp_format = timestamp_format;
        self
    }

    /// Set the XML namespace for services that require one.
    pub fn with_xml_namespace(mut self, xml_namespace: &str) -> Self {
        self.xml_namespace = Some(xml_namespace.to_string());
        self
    }

    /// Replace host and region resolution.
    pub fn with_endpoint_resolver(mut self, resolver: EndpointResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Rebind host and region resolution to DigitalOcean Spaces.
    pub fn with_digital_ocean_spaces(mut self) -> Self {
        self.resolver = EndpointResolver::DigitalOceanSpaces;
        self
    }

    /// The service's short name, used for DNS and the service segment of
    /// the credential scope.
    pub fn endpoint_prefix(&self) -> &str {
        &self.endpoint_prefix
    }

    /// The service API version, typically `YYYY-MM-DD`.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// The protocol dialect.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// The signing scheme.
    pub fn signer(&self) -> SigningScheme {
        self.signer
    }

    /// Prefix joined with the operation name into `x-amz-target`.
    pub fn target_prefix(&self) -> &str {
        &self.target_prefix
    }

    /// How payload timestamps are rendered.
    pub fn timestamp_format(&self) -> TimestampFormat {
        self.timestamp_format
    }

    /// The XML namespace, if one was set.
    pub fn xml_namespace(&self) -> Option<&str> {
        self.xml_namespace.as_deref()
    }

    /// The endpoint this descriptor points at.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The bare host requests go to: no scheme, no trailing slash.
    pub fn host(&self) -> String {
        match self.resolver {
            EndpointResolver::Standard => match &self.endpoint {
                Endpoint::Global => format!("{}.amazonaws.com", self.endpoint_prefix),
                Endpoint::Regional(region) => {
                    format!("{}.{}.amazonaws.com", self.endpoint_prefix, region)
                }
            },
            EndpointResolver::DigitalOceanSpaces => match &self.endpoint {
                Endpoint::Global => "nyc3.digitaloceanspaces.com".to_string(),
                Endpoint::Regional(region) => format!("{region}.digitaloceanspaces.com"),
            },
            EndpointResolver::Custom { host, .. } => host(&self.endpoint, &self.endpoint_prefix),
        }
    }

    /// The region requests are signed for. Global endpoints sign as
    /// `us-east-1`.
    pub fn region(&self) -> String {
        match self.resolver {
            EndpointResolver::Standard => match &self.endpoint {
                Endpoint::Global => "us-east-1".to_string(),
                Endpoint::Regional(region) => region.clone(),
            },
            EndpointResolver::DigitalOceanSpaces => match &self.endpoint {
                Endpoint::Global => "nyc3".to_string(),
                Endpoint::Regional(region) => region.clone(),
            },
            EndpointResolver::Custom { region, .. } => region(&self.endpoint),
        }
    }

    /// The service name signed into credential scopes: the override when
    /// set, the endpoint prefix otherwise.
    pub fn signing_name(&self) -> &str {
        self.signing_name.as_deref().unwrap_or(&self.endpoint_prefix)
    }

    /// Content type sent with request payloads.
    pub fn content_type(&self) -> String {
        if self.protocol == Protocol::RestXml {
            return "application/xml; charset=utf-8".to_string();
        }
        match &self.json_version {
            Some(v) => format!("application/x-amz-json-{v}; charset=utf-8"),
            None => "application/json; charset=utf-8".to_string(),
        }
    }

    /// Media type the service is asked to answer with.
    pub fn accept_type(&self) -> &'static str {
        if self.protocol == Protocol::RestXml {
            "application/xml"
        } else {
            "application/json"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_prefix_default() {
        let service = Service::global("acm", "2015-12-08", Protocol::Json, SigningScheme::V4);
        assert_eq!(service.target_prefix(), "AWSACM_20151208");
    }

    #[test]
    fn test_target_prefix_override() {
        let service = Service::global("acm", "2015-12-08", Protocol::Json, SigningScheme::V4)
            .with_target_prefix("CertificateManager");
        assert_eq!(service.target_prefix(), "CertificateManager");
    }

    #[test]
    fn test_timestamp_format_defaults() {
        let cases = vec![
            (Protocol::Ec2, TimestampFormat::Iso8601),
            (Protocol::Json, TimestampFormat::UnixTimestamp),
            (Protocol::Query, TimestampFormat::Iso8601),
            (Protocol::RestJson, TimestampFormat::UnixTimestamp),
            (Protocol::RestXml, TimestampFormat::Iso8601),
        ];

        for (protocol, expected) in cases {
            let service = Service::global("sts", "2011-06-15", protocol, SigningScheme::V4);
            assert_eq!(
                service.timestamp_format(),
                expected,
                "failed on protocol: {protocol:?}"
            );
        }
    }

    #[test]
    fn test_host_regional() {
        let service = Service::regional(
            "acm",
            "2015-12-08",
            Protocol::Json,
            SigningScheme::V4,
            "ca-central-1",
        );
        assert_eq!(service.host(), "acm.ca-central-1.amazonaws.com");
        assert_eq!(service.region(), "ca-central-1");
    }

    #[test]
    fn test_host_global() {
        let service = Service::global("sts", "2011-06-15", Protocol::Query, SigningScheme::V4);
        assert_eq!(service.host(), "sts.amazonaws.com");
        assert_eq!(service.region(), "us-east-1");
    }

    #[test]
    fn test_digital_ocean_spaces() {
        let service = Service::regional("s3", "2006-03-01", Protocol::RestXml, SigningScheme::V4, "sfo2")
            .with_digital_ocean_spaces();
        assert_eq!(service.host(), "sfo2.digitaloceanspaces.com");
        assert_eq!(service.region(), "sfo2");

        let global = Service::global("s3", "2006-03-01", Protocol::RestXml, SigningScheme::V4)
            .with_digital_ocean_spaces();
        assert_eq!(global.host(), "nyc3.digitaloceanspaces.com");
        assert_eq!(global.region(), "nyc3");
    }

    #[test]
    fn test_custom_resolver() {
        let service = Service::global("minio", "2006-03-01", Protocol::RestXml, SigningScheme::V4)
            .with_endpoint_resolver(EndpointResolver::Custom {
                host: |_, prefix| format!("{prefix}.localhost"),
                region: |_| "local".to_string(),
            });
        assert_eq!(service.host(), "minio.localhost");
        assert_eq!(service.region(), "local");
    }

    #[test]
    fn test_content_type_matrix() {
        let xml = Service::global("s3", "2006-03-01", Protocol::RestXml, SigningScheme::V4);
        assert_eq!(xml.content_type(), "application/xml; charset=utf-8");
        assert_eq!(xml.accept_type(), "application/xml");

        let json = Service::global("acm", "2015-12-08", Protocol::Json, SigningScheme::V4)
            .with_json_version("1.1");
        assert_eq!(json.content_type(), "application/x-amz-json-1.1; charset=utf-8");
        assert_eq!(json.accept_type(), "application/json");

        let plain = Service::global("sts", "2011-06-15", Protocol::Query, SigningScheme::V4);
        assert_eq!(plain.content_type(), "application/json; charset=utf-8");
        assert_eq!(plain.accept_type(), "application/json");
    }

    #[test]
    fn test_signing_name_defaults_to_endpoint_prefix() {
        let service = Service::global("sts", "2011-06-15", Protocol::Query, SigningScheme::V4);
        assert_eq!(service.signing_name(), "sts");

        let overridden = service.with_signing_name("aws-sts");
        assert_eq!(overridden.signing_name(), "aws-sts");
    }

    #[test]
    fn test_setters_do_not_touch_the_original() {
        let service = Service::global("acm", "2015-12-08", Protocol::Json, SigningScheme::V4);
        let _updated = service.clone().with_target_prefix("Other");
        assert_eq!(service.target_prefix(), "AWSACM_20151208");
    }
}
