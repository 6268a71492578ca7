/// Error type for the sascar-rs crate.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SascarError {
    /// Username or password is empty or not defined.
    #[error("Username or password not defined.")]
    #[diagnostic(code(sascar_rs::error::SascarError::MissingCredentials))]
    MissingCredentials,

    /// The service answered with a SOAP fault.
    #[error("SOAP fault {code}: {message}")]
    #[diagnostic(code(sascar_rs::error::SascarError::Fault))]
    Fault {
        /// The `faultcode` reported by the service.
        code: String,
        /// The `faultstring` reported by the service.
        message: String,
    },

    /// The service answered with a non-success HTTP status and no fault envelope.
    #[error("The service answered with HTTP status {status}.")]
    #[diagnostic(code(sascar_rs::error::SascarError::HttpStatus))]
    HttpStatus {
        /// The status of the response.
        status: reqwest::StatusCode,
    },

    /// The response did not contain a SOAP body.
    #[error("The response did not contain a SOAP body.")]
    #[diagnostic(code(sascar_rs::error::SascarError::MissingBody))]
    MissingBody,

    /// A JSON operation did not return a JSON document.
    #[error("The operation did not return a JSON document.")]
    #[diagnostic(code(sascar_rs::error::SascarError::NotJson))]
    NotJson,

    /// The request to the server has failed.
    #[error(transparent)]
    #[diagnostic(code(sascar_rs::error::SascarError::ReqwestError))]
    ReqwestError(#[from] reqwest::Error),

    /// The response envelope could not be parsed.
    #[error(transparent)]
    #[diagnostic(code(sascar_rs::error::SascarError::XmlError))]
    XmlError(#[from] quick_xml::Error),

    /// A JSON payload could not be read or written.
    #[error(transparent)]
    #[diagnostic(code(sascar_rs::error::SascarError::JsonError))]
    JsonError(#[from] serde_json::Error),

    /// Url parsing error.
    #[error(transparent)]
    #[diagnostic(code(sascar_rs::error::SascarError::UrlParseError))]
    UrlParseError(#[from] url::ParseError),

    /// An export file could not be written.
    #[error(transparent)]
    #[diagnostic(code(sascar_rs::error::SascarError::IoError))]
    IoError(#[from] std::io::Error),

    /// A CSV export could not be written.
    #[error(transparent)]
    #[diagnostic(code(sascar_rs::error::SascarError::CsvError))]
    CsvError(#[from] csv::Error),

    /// An XLSX export could not be written.
    #[error(transparent)]
    #[diagnostic(code(sascar_rs::error::SascarError::XlsxError))]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),
}
