use futures::FutureExt;
use futures::future::BoxFuture;

use super::{ImportError, KeywordDetector};

pub const DEMO_KEYWORDS: [&str; 3] = ["Mitochondria", "ATP", "Cellular Respiration"];

/// Stands in for a text-analysis service; always answers with the demo terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoKeywordDetector;

impl KeywordDetector for DemoKeywordDetector {
    fn detect(&self, _text: String) -> BoxFuture<'static, Result<Vec<String>, ImportError>> {
        let keywords = DEMO_KEYWORDS.iter().map(|k| k.to_string()).collect();
        futures::future::ready(Ok(keywords)).boxed()
    }
}
