//! XBRL instance document parsing.
//!
//! Reads `xbrli:context` blocks (explicit and typed dimension members,
//! instant or duration periods) and every element carrying a `contextRef`
//! attribute as a fact. Element matching uses local names, so documents that
//! declare the XBRL namespaces under other prefixes parse the same way.

use bdc_core::{BdcError, Dimension, FactSet, Result, TaggedFact, XbrlContext};
use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Context child whose text is being collected.
#[derive(Debug)]
enum Capture {
    Instant,
    StartDate,
    EndDate,
    Member(String),
}

/// A fact whose closing tag has not been reached yet.
#[derive(Debug)]
struct OpenFact {
    concept: String,
    context_ref: String,
    numeric: bool,
    depth: usize,
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| BdcError::Parse(format!("Bad XML attribute: {}", e)))?;
        if attr.key.local_name().as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| BdcError::Parse(format!("Bad XML attribute value: {}", e)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn qualified_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text.get(..10).unwrap_or(text), "%Y-%m-%d").ok()
}

fn finish_fact(open: OpenFact, text: &str) -> TaggedFact {
    let value = text.trim();
    let mut fact = TaggedFact::new(open.concept, value, open.context_ref);
    if open.numeric {
        fact.numeric_value = value.replace(',', "").parse().ok();
    }
    fact
}

/// Parses an XBRL instance document into a [`FactSet`].
///
/// Facts take their period from their context. Facts reported with a
/// `unitRef` also carry a numeric value when their text parses as a number.
pub fn parse_instance(xml: &str) -> Result<FactSet> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut contexts: Vec<XbrlContext> = Vec::new();
    let mut facts: Vec<TaggedFact> = Vec::new();
    let mut context: Option<XbrlContext> = None;
    let mut capture: Option<Capture> = None;
    let mut open_fact: Option<OpenFact> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if let Some(open) = open_fact.as_mut() {
                    open.depth += 1;
                } else if context.is_some() {
                    match e.local_name().as_ref() {
                        b"instant" => capture = Some(Capture::Instant),
                        b"startDate" => capture = Some(Capture::StartDate),
                        b"endDate" => capture = Some(Capture::EndDate),
                        b"explicitMember" | b"typedMember" => {
                            let dimension = attribute(&e, b"dimension")?.unwrap_or_default();
                            capture = Some(Capture::Member(dimension));
                        }
                        _ => {}
                    }
                    if capture.is_some() {
                        text.clear();
                    }
                } else if e.local_name().as_ref() == b"context" {
                    let id = attribute(&e, b"id")?.unwrap_or_default();
                    context = Some(XbrlContext::new(id));
                } else if let Some(context_ref) = attribute(&e, b"contextRef")? {
                    open_fact = Some(OpenFact {
                        concept: qualified_name(&e),
                        context_ref,
                        numeric: attribute(&e, b"unitRef")?.is_some(),
                        depth: 0,
                    });
                    text.clear();
                }
            }
            Ok(Event::Empty(e)) => {
                if open_fact.is_none()
                    && context.is_none()
                    && let Some(context_ref) = attribute(&e, b"contextRef")?
                {
                    let open = OpenFact {
                        concept: qualified_name(&e),
                        context_ref,
                        numeric: attribute(&e, b"unitRef")?.is_some(),
                        depth: 0,
                    };
                    facts.push(finish_fact(open, ""));
                }
            }
            Ok(Event::Text(t)) => {
                if open_fact.is_some() || capture.is_some() {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| BdcError::Parse(format!("Bad XML text: {}", e)))?;
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(c)) => {
                if open_fact.is_some() {
                    text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::End(e)) => {
                if let Some(open) = open_fact.as_mut() {
                    if open.depth > 0 {
                        open.depth -= 1;
                    } else if let Some(open) = open_fact.take() {
                        facts.push(finish_fact(open, &text));
                        text.clear();
                    }
                } else if e.local_name().as_ref() == b"context" {
                    capture = None;
                    if let Some(done) = context.take() {
                        contexts.push(done);
                    }
                } else if let Some(ctx) = context.as_mut() {
                    match (e.local_name().as_ref(), capture.take()) {
                        (b"instant", Some(Capture::Instant)) => ctx.period_instant = parse_date(&text),
                        (b"startDate", Some(Capture::StartDate)) => ctx.period_start = parse_date(&text),
                        (b"endDate", Some(Capture::EndDate)) => ctx.period_end = parse_date(&text),
                        (b"explicitMember" | b"typedMember", Some(Capture::Member(dimension))) => {
                            ctx.dimensions.push(Dimension::new(dimension, text.trim()));
                        }
                        // Closing a typed member's inner element: keep collecting.
                        (_, pending) => capture = pending,
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(BdcError::Parse(format!(
                    "XML parse error at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            Ok(_) => {}
        }
        buf.clear();
    }

    let periods: HashMap<&str, &XbrlContext> = contexts.iter().map(|c| (c.id.as_str(), c)).collect();
    for fact in &mut facts {
        if let Some(ctx) = periods.get(fact.context_ref.as_str()) {
            fact.period_start = ctx.period_start;
            fact.period_end = ctx.period_end;
            fact.period_instant = ctx.period_instant;
        }
    }

    Ok(FactSet::new(facts, contexts))
}

/// File name of the XBRL instance that accompanies an inline XBRL document.
///
/// `arcc-20241231.htm` becomes `arcc-20241231_htm.xml`.
#[must_use]
pub fn instance_file_name(primary_document: &str) -> String {
    match primary_document.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{ext}.xml"),
        None => format!("{primary_document}_htm.xml"),
    }
}
