//! Annotation source reader.
//!
//! Turns one annotator's XML into a [`TokenMap`]. Every token element anywhere
//! in the tree becomes one record:
//!
//! ```xml
//! <token xml:id="t1">
//!   <form modified="False">házban</form>
//!   <morph>
//!     <ana correct="True" modified="True">
//!       <lemma>ház</lemma><detailed>[/N][Ine]</detailed><simple>N</simple>
//!     </ana>
//!   </morph>
//! </token>
//! ```

use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;

use crate::config::ReaderConfig;
use crate::error::AgreementError;
use crate::model::{AnalysisCandidate, TokenMap, TokenRecord};

const FORM: &[u8] = b"form";
const ANALYSIS: &[u8] = b"ana";
const LEMMA: &[u8] = b"lemma";
const DETAILED: &[u8] = b"detailed";
const SIMPLE: &[u8] = b"simple";

/// Parse one annotator's XML into token records keyed by id.
///
/// `source_label` only names the source in error messages.
pub fn parse_tokens(
    source_label: &str,
    xml: &str,
    config: &ReaderConfig,
) -> Result<TokenMap, AgreementError> {
    let mut reader = Reader::from_str(xml);
    let mut parser = TokenParser::new(source_label, config);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => parser.open(e)?,
            Ok(Event::Empty(ref e)) => {
                parser.open(e)?;
                parser.close(e.name().as_ref())?;
            }
            Ok(Event::End(ref e)) => parser.close(e.name().as_ref())?,
            Ok(Event::Text(ref e)) if parser.capturing() => {
                let text = e
                    .decode()
                    .map_err(|err| parser.malformed(format!("undecodable text: {err}")))?;
                parser.push_text(&text);
            }
            Ok(Event::CData(ref e)) if parser.capturing() => {
                parser.push_text(&String::from_utf8_lossy(e));
            }
            Ok(Event::GeneralRef(ref e)) if parser.capturing() => {
                let resolved = resolve_reference(e).ok_or_else(|| {
                    parser.malformed(format!(
                        "unknown entity reference '&{};'",
                        e.decode().unwrap_or_default()
                    ))
                })?;
                parser.push_text(&resolved);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(parser.malformed(format!(
                    "XML syntax error at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    let tokens = parser.finish()?;
    log::debug!("read {} token(s) from {}", tokens.len(), source_label);
    Ok(tokens)
}

fn resolve_reference(reference: &BytesRef<'_>) -> Option<String> {
    if let Ok(Some(ch)) = reference.resolve_char_ref() {
        return Some(ch.to_string());
    }
    let name = reference.decode().ok()?;
    quick_xml::escape::resolve_predefined_entity(&name).map(str::to_string)
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).to_string(),
        })
}

fn flag(e: &BytesStart<'_>, key: &[u8]) -> Option<bool> {
    attribute(e, key).map(|v| matches!(v.as_str(), "True" | "true"))
}

// ---------------------------------------------------------------------------
// Parser state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Form,
    Lemma,
    Detailed,
    Simple,
}

impl Field {
    fn element(self) -> &'static [u8] {
        match self {
            Self::Form => FORM,
            Self::Lemma => LEMMA,
            Self::Detailed => DETAILED,
            Self::Simple => SIMPLE,
        }
    }
}

struct PendingToken {
    id: String,
    form_modified: Option<bool>,
    form: Option<String>,
    candidates: Vec<AnalysisCandidate>,
}

struct PendingCandidate {
    is_correct: bool,
    is_modified: bool,
    lemma: Option<String>,
    detailed: Option<String>,
    simple: Option<String>,
}

impl PendingCandidate {
    /// Err carries the name of the first missing child element.
    fn build(self) -> Result<AnalysisCandidate, &'static str> {
        Ok(AnalysisCandidate {
            lemma: self.lemma.ok_or("lemma")?,
            detailed_tag: self.detailed.ok_or("detailed")?,
            simple_tag: self.simple.ok_or("simple")?,
            is_correct: self.is_correct,
            is_modified: self.is_modified,
        })
    }
}

struct TokenParser<'a> {
    source_label: &'a str,
    config: &'a ReaderConfig,
    tokens: TokenMap,
    token: Option<PendingToken>,
    candidate: Option<PendingCandidate>,
    field: Option<Field>,
    text: String,
}

impl<'a> TokenParser<'a> {
    fn new(source_label: &'a str, config: &'a ReaderConfig) -> Self {
        Self {
            source_label,
            config,
            tokens: TokenMap::new(),
            token: None,
            candidate: None,
            field: None,
            text: String::new(),
        }
    }

    fn capturing(&self) -> bool {
        self.field.is_some()
    }

    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn current_id(&self) -> Option<String> {
        self.token.as_ref().map(|t| t.id.clone())
    }

    fn malformed(&self, message: impl Into<String>) -> AgreementError {
        AgreementError::MalformedInput {
            source_label: self.source_label.to_string(),
            token_id: self.current_id(),
            message: message.into(),
        }
    }

    fn begin(&mut self, field: Field) {
        self.field = Some(field);
        self.text.clear();
    }

    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), AgreementError> {
        let name = e.name();
        let name = name.as_ref();

        if name == self.config.token_element.as_bytes() {
            if self.token.is_some() {
                return Err(self.malformed("nested token element"));
            }
            let id = attribute(e, self.config.id_attribute.as_bytes()).ok_or_else(|| {
                self.malformed(format!(
                    "<{}> without '{}' attribute",
                    self.config.token_element, self.config.id_attribute
                ))
            })?;
            self.token = Some(PendingToken {
                id,
                form_modified: None,
                form: None,
                candidates: Vec::new(),
            });
            return Ok(());
        }

        // Everything else only counts inside a token, outside a captured field.
        if self.token.is_none() || self.field.is_some() {
            return Ok(());
        }

        match name {
            FORM if self.candidate.is_none() => {
                let modified = flag(e, b"modified")
                    .ok_or_else(|| self.malformed("<form> without 'modified' attribute"))?;
                if self.token.as_ref().is_some_and(|t| t.form_modified.is_some()) {
                    return Err(self.malformed("more than one <form> element"));
                }
                if let Some(token) = self.token.as_mut() {
                    token.form_modified = Some(modified);
                }
                self.begin(Field::Form);
            }
            ANALYSIS => {
                if self.candidate.is_some() {
                    return Err(self.malformed("nested <ana> element"));
                }
                let is_correct = flag(e, b"correct")
                    .ok_or_else(|| self.malformed("<ana> without 'correct' attribute"))?;
                self.candidate = Some(PendingCandidate {
                    is_correct,
                    is_modified: flag(e, b"modified").unwrap_or(false),
                    lemma: None,
                    detailed: None,
                    simple: None,
                });
            }
            LEMMA if self.candidate.is_some() => self.begin(Field::Lemma),
            DETAILED if self.candidate.is_some() => self.begin(Field::Detailed),
            SIMPLE if self.candidate.is_some() => self.begin(Field::Simple),
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) -> Result<(), AgreementError> {
        if let Some(field) = self.field {
            if name != field.element() {
                return Ok(());
            }
            self.field = None;
            let text = std::mem::take(&mut self.text);
            match field {
                Field::Form => {
                    if let Some(token) = self.token.as_mut() {
                        token.form = Some(text);
                    }
                }
                Field::Lemma | Field::Detailed | Field::Simple => {
                    if let Some(candidate) = self.candidate.as_mut() {
                        let slot = match field {
                            Field::Lemma => &mut candidate.lemma,
                            Field::Detailed => &mut candidate.detailed,
                            _ => &mut candidate.simple,
                        };
                        *slot = Some(text);
                    }
                }
            }
            return Ok(());
        }

        if name == ANALYSIS {
            if let Some(pending) = self.candidate.take() {
                let candidate = pending
                    .build()
                    .map_err(|missing| self.malformed(format!("<ana> without <{missing}>")))?;
                if let Some(token) = self.token.as_mut() {
                    token.candidates.push(candidate);
                }
            }
            return Ok(());
        }

        if name == self.config.token_element.as_bytes() {
            if let Some(token) = self.token.as_ref() {
                if token.form.is_none() {
                    return Err(self.malformed("missing <form> element"));
                }
                if self.tokens.contains_key(&token.id) {
                    return Err(self.malformed("duplicate token id"));
                }
            }
            if let Some(token) = self.token.take() {
                let record = TokenRecord {
                    id: token.id.clone(),
                    form: token.form.unwrap_or_default(),
                    is_modified: token.form_modified.unwrap_or(false),
                    candidate_analyses: token.candidates,
                };
                self.tokens.insert(token.id, record);
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<TokenMap, AgreementError> {
        if self.token.is_some() {
            return Err(self.malformed("unterminated token element"));
        }
        Ok(self.tokens)
    }
}
