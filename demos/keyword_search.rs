//! Keyword search and blended guidance over the bundled corpus.
//!
//! ```text
//! cargo run --example keyword_search -- "patience, hardship" en
//! ```

use hikmah::prelude::*;

#[tokio::main]
async fn main() -> hikmah::Result<()> {
  println!("=== Hikmah Keyword Search Example ===\n");

  let mut args = std::env::args().skip(1);
  let keywords = args.next().unwrap_or_else(|| "mercy, forgiveness".to_string());
  let fields: FieldSelector = args.next().as_deref().unwrap_or("en").parse()?;

  let config = Config::from_env();
  let store = CorpusStore::bundled()?;
  println!("Loaded {} passages\n", store.len());

  let matcher = Matcher::builder(std::sync::Arc::new(store))
    .config(config.matcher.clone())
    .build();

  println!("Keywords: \"{}\"\n", keywords);
  let results = matcher.keyword_search(&keywords, fields, None)?;
  if results.is_empty() {
    println!("  No results found.\n");
  }
  for (i, result) in results.iter().enumerate() {
    print_result(i + 1, result);
  }

  // Without an API key the prompt goes through the keyword fallback.
  let prompt = "I am struggling with debt and feel hopeless";
  println!("\nPrompt: \"{}\"\n", prompt);

  #[cfg(feature = "http")]
  let extractor = match &config.extractor.api_key {
    Some(_) => match ChatExtractor::new(config.extractor.clone()) {
      Ok(extractor) => Some(extractor),
      Err(err) => {
        tracing::warn!(error = %err, "could not build chat extractor, using keyword fallback");
        eprintln!("  chat extractor unavailable: {err}");
        None
      }
    },
    None => None,
  };
  #[cfg(feature = "http")]
  let extractor = extractor.as_ref().map(|e| e as &dyn TopicExtractor);
  #[cfg(not(feature = "http"))]
  let extractor: Option<&dyn TopicExtractor> = None;

  let timeout = config.extractor.timeout();
  let answer = matcher.answer(extractor, prompt, fields, timeout).await?;
  println!(
    "  topics: {:?}, keywords: {:?}\n",
    answer.extraction.topics, answer.extraction.keywords
  );

  println!("Verses:");
  for (i, result) in answer.guidance.verses.iter().enumerate() {
    print_result(i + 1, result);
  }
  println!("Hadiths:");
  for (i, result) in answer.guidance.hadiths.iter().enumerate() {
    print_result(i + 1, result);
  }

  Ok(())
}

fn print_result(rank: usize, result: &ScoredResult<'_>) {
  println!(
    "  {}. {} (score: {:.3}, matched: {:?})",
    rank,
    result.passage.source().reference,
    result.relevance_score,
    result.matched_keywords
  );
  if let Some(text) = result.texts.primary {
    println!("     {}", text);
  }
  if let Some(text) = result.texts.secondary {
    println!("     {}", text);
  }
}
