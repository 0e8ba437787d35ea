/// Identifier for a quote category.
/// Examples: `all`, `love`, `peace`
pub type CategoryId = String;
/// Lowercase keyword matched as a substring of quote text.
/// Examples: `heart`, `tranquil`
pub type Keyword = String;
/// Identifier for the source that produced a quote pool.
/// Examples: `dummyjson`, `in_memory`
pub type SourceId = String;
/// Key used in the key-value store.
/// Examples: `allQuotes`, `shownQuotes_love`, `translation_Be yourself._es`
pub type StoreKey = String;
/// Two-letter language code.
/// Examples: `en`, `es`, `ja`
pub type LanguageCode = String;
/// Fully formed endpoint URL.
/// Example: `https://dummyjson.com/quotes?limit=0`
pub type EndpointUrl = String;
