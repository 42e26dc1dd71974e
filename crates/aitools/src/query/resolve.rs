//! Two-stage resolution: ask the remote API, answer from demo data if it fails

use std::future::Future;

use serde::Serialize;

use crate::error::Error;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Remote,
    Demo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: Source) -> Self {
        Self { value, source }
    }

    pub fn is_demo(&self) -> bool {
        self.source == Source::Demo
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved {
            value: f(self.value),
            source: self.source,
        }
    }
}

/// Await `primary`; if it fails with a fallback-eligible error, try `fallback`.
///
/// When the fallback has nothing for these parameters the primary error is
/// returned unchanged.
pub async fn resolve<T, F, D>(primary: F, fallback: D) -> Result<Resolved<T>, Error>
where
    F: Future<Output = Result<T, Error>>,
    D: FnOnce() -> Option<T>,
{
    let err = match primary.await {
        Ok(value) => return Ok(Resolved::new(value, Source::Remote)),
        Err(err) => err,
    };

    if !err.is_fallback_eligible() {
        return Err(err);
    }

    match fallback() {
        Some(value) => {
            log::warn!("API request failed ({err}), using demo data");
            Ok(Resolved::new(value, Source::Demo))
        }
        None => Err(err),
    }
}

/// Answer from demo data only; `what` names the missing item in the error
pub fn resolve_offline<T, D>(fallback: D, what: impl Into<String>) -> Result<Resolved<T>, Error>
where
    D: FnOnce() -> Option<T>,
{
    fallback()
        .map(|value| Resolved::new(value, Source::Demo))
        .ok_or_else(|| Error::NotFoundLocal(what.into()))
}
