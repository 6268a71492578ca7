/// Generates an ordered [`Parameters`](crate::params::Parameters) collection
/// with map-literal syntax.
///
/// ## Example
///
/// ```
/// use sascar_rs::params;
///
/// let parameters = params! {
///     "quantidade" => "10",
///     "idCliente" => "0",
/// };
/// assert_eq!(parameters.len(), 2);
/// ```
#[macro_export]
macro_rules! params {
    ($($k:expr => $v:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut parameters = $crate::params::Parameters::new();
        $(parameters = parameters.param($k, $v);)*
        parameters
    }};
}
