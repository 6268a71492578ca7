/// An ordered collection of parameters for an operation.
///
/// SasIntegra operations are RPC style, so the parameter elements are
/// rendered in insertion order. Repeated names are allowed and become
/// repeated elements (`idEventoList` is sent this way).
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    inner: Vec<(String, String)>,
}

impl Parameters {
    /// Creates a new empty collection of parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter to the collection
    pub fn param<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.inner.push((key.into(), value.into()));
        self
    }

    /// Adds multiple parameters to the collection
    pub fn extend<I, K, V>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in iter {
            self.inner.push((k.into(), v.into()));
        }
        self
    }

    /// Iterates over the parameters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the amount of parameters in the collection
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the inner list of parameters
    pub fn into_inner(self) -> Vec<(String, String)> {
        self.inner
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Parameters {
    fn from(arr: [(&str, &str); N]) -> Self {
        Self {
            inner: arr
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl<const N: usize> From<[(String, String); N]> for Parameters {
    fn from(arr: [(String, String); N]) -> Self {
        Self {
            inner: arr.into_iter().collect(),
        }
    }
}
