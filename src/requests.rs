use quick_xml::escape::escape;

use crate::params::Parameters;

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
/// Target namespace of the SasIntegra service.
pub const SERVICE_NS: &str = "http://webservice.web.integracao.sascar.com.br/";
/// Production endpoint of the SasIntegra service.
pub const DEFAULT_ENDPOINT: &str =
    "https://sasintegra.sascar.com.br/SasIntegra/SasIntegraWSService";

/// The request envelope for a SasIntegra operation.
///
/// Parameter elements are unqualified and rendered in insertion order, the
/// service resolves them by name and position.
#[derive(Debug, Clone)]
pub struct SoapRequest {
    /// The name of the remote operation.
    pub operation: String,
    /// The parameters of the operation.
    pub parameters: Parameters,
}

impl SoapRequest {
    /// Creates a new `SoapRequest` for the named operation.
    pub fn new(operation: &str, parameters: Parameters) -> Self {
        Self {
            operation: operation.to_string(),
            parameters,
        }
    }

    /// Renders the request as a SOAP 1.1 envelope.
    pub fn to_xml(&self) -> String {
        let mut envelope = String::with_capacity(512);
        envelope.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        envelope.push_str(&format!(
            "<soapenv:Envelope xmlns:soapenv=\"{SOAP_ENV_NS}\" xmlns:web=\"{SERVICE_NS}\">"
        ));
        envelope.push_str("<soapenv:Header/><soapenv:Body>");
        envelope.push_str(&format!("<web:{}>", self.operation));

        for (name, value) in self.parameters.iter() {
            envelope.push_str(&format!("<{}>{}</{}>", name, escape(value), name));
        }

        envelope.push_str(&format!("</web:{}>", self.operation));
        envelope.push_str("</soapenv:Body></soapenv:Envelope>");
        envelope
    }
}
