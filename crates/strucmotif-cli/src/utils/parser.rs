use std::fmt;
use strucmotif::core::models::residue::ResidueType;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid residue selector '{0}'. Expected 'CHAIN:SEQ_ID' (e.g., 'A:57').")]
    InvalidResidueSelector(String),

    #[error("Invalid exchange '{0}'. Expected 'CHAIN:SEQ_ID=TYPE[,TYPE...]' (e.g., 'A:195=THR,CYS').")]
    InvalidExchange(String),

    #[error("Unknown residue type '{code}' in '{input}'.")]
    UnknownResidueType { code: String, input: String },

    #[error("Component '{component}' cannot be empty in '{input}'.")]
    EmptyComponent {
        component: &'static str,
        input: String,
    },
}

/// Author-facing address of a residue: chain identifier plus sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueSelector {
    pub chain_id: String,
    pub seq_id: i32,
}

impl fmt::Display for ResidueSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.seq_id)
    }
}

/// Alternative residue types accepted at one motif residue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub selector: ResidueSelector,
    pub types: Vec<ResidueType>,
}

pub fn parse_residue_selector(input: &str) -> Result<ResidueSelector, ParseError> {
    let (chain_id, seq_id) = input
        .trim()
        .split_once(':')
        .ok_or_else(|| ParseError::InvalidResidueSelector(input.to_string()))?;

    let chain_id = chain_id.trim();
    if chain_id.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "chain",
            input: input.to_string(),
        });
    }
    let seq_id = seq_id
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidResidueSelector(input.to_string()))?;

    Ok(ResidueSelector {
        chain_id: chain_id.to_string(),
        seq_id,
    })
}

pub fn parse_exchange(input: &str) -> Result<Exchange, ParseError> {
    let (selector, types) = input
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidExchange(input.to_string()))?;

    let selector = parse_residue_selector(selector)?;

    let types = types
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            ResidueType::parse_amino_acid_first(code)
                .map_err(|_| ParseError::UnknownResidueType {
                    code: code.to_string(),
                    input: input.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if types.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "types",
            input: input.to_string(),
        });
    }

    Ok(Exchange { selector, types })
}
