use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Word pattern: maximal runs of Unicode word characters
pub const WORD_PATTERN: &str = r"\w+";

/// Regex tokenizer
/// 文書テキストをトークン列に分割します
///
/// # Examples
/// ```
/// use related_posts::Tokenizer;
/// let tokenizer = Tokenizer::new(true).unwrap();
/// assert_eq!(tokenizer.tokenize("Rust, rust & RUST!"), vec!["rust", "rust", "rust"]);
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
    lowercase: bool,
}

impl Tokenizer {
    /// Tokenizer using [`WORD_PATTERN`]
    pub fn new(lowercase: bool) -> crate::Result<Self> {
        Self::with_pattern(WORD_PATTERN, lowercase)
    }

    /// Tokenizer with a custom token pattern; every match becomes a token
    pub fn with_pattern(pattern: &str, lowercase: bool) -> crate::Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            lowercase,
        })
    }

    #[inline]
    pub fn lowercase(&self) -> bool {
        self.lowercase
    }

    /// Split text into tokens. Never fails; text without word characters
    /// yields an empty sequence.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        if self.lowercase {
            let lowered = text.to_lowercase();
            self.pattern
                .find_iter(&lowered)
                .map(|m| m.as_str().to_string())
                .collect()
        } else {
            self.pattern
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect()
        }
    }
}

///  TokenFrequency 構造体
/// 1文書内のtokenの出現頻度を管理するための構造体です
/// tokenの初出順を保持します
///
/// # Examples
/// ```
/// use related_posts::TokenFrequency;
/// let mut token_freq = TokenFrequency::new();
/// token_freq.add_token("token1");
/// token_freq.add_token("token2");
/// token_freq.add_token("token1");
///
/// assert_eq!(token_freq.token_count("token1"), 2);
/// assert_eq!(token_freq.token_set_ref_str(), vec!["token1", "token2"]);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<String, u32>,
}

/// Tokenの追加の実装
impl TokenFrequency {
    /// 新しいTokenFrequencyを作成するメソッド
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
        }
    }

    /// tokenを追加する
    ///
    /// # Arguments
    /// * `token` - 追加するトークン
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        match self.token_count.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.token_count.insert(token.to_string(), 1);
            }
        }
        self
    }

    /// 複数のtokenを追加する
    ///
    /// # Arguments
    /// * `tokens` - 追加するトークンのスライス
    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }
}

impl<T> From<&[T]> for TokenFrequency
where
    T: AsRef<str>,
{
    fn from(tokens: &[T]) -> Self {
        let mut freq = TokenFrequency::new();
        freq.add_tokens(tokens);
        freq
    }
}

/// 情報取得
impl TokenFrequency {
    /// tokenの出現回数を取得 (無ければ0)
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// ユニークなtokenを初出順で返す
    #[inline]
    pub fn token_set_ref_str(&self) -> Vec<&str> {
        self.token_count.keys().map(|s| s.as_str()).collect()
    }

    /// (token, count) を初出順で返す
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.token_count.iter().map(|(t, &c)| (t.as_str(), c))
    }
}
