//! Canned prompts offered through `prompts/list` and `prompts/get`.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

use crate::protocol::{GetPromptResult, McpErrorCode, PromptInfo, PromptMessage};
use crate::schema::{ArgumentSchema, Arguments, FieldSpec, Literal, SchemaError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    #[error("Prompt {0} not found")]
    NotFound(String),
    #[error("{0}")]
    InvalidParams(String),
}

impl PromptError {
    pub fn code(&self) -> McpErrorCode {
        match self {
            Self::NotFound(_) => McpErrorCode::PromptNotFound,
            Self::InvalidParams(_) => McpErrorCode::InvalidParams,
        }
    }
}

impl From<ValidationError> for PromptError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidParams(err.to_string())
    }
}

/// Renders one message from validated arguments. Must be pure.
pub type PromptHandler = fn(&Arguments) -> Result<PromptMessage, PromptError>;

#[derive(Clone, Copy)]
pub struct PromptDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub schema: Option<ArgumentSchema>,
    pub handler: PromptHandler,
}

impl fmt::Debug for PromptDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

pub const SUPPORTED_NETWORKS: &[&str] = &["bnb", "ethereum", "solana"];

const SWAP_TOKEN_ARGS: &[FieldSpec] = &[
    FieldSpec::string("input_token_address", "The address of the token to swap"),
    FieldSpec::string("output_token_address", "The address of the token to receive"),
    FieldSpec::string("input_amount", "The amount of tokens to swap").optional(),
    FieldSpec::string("output_amount", "The amount of tokens to receive").optional(),
];

const GET_BALANCE_ARGS: &[FieldSpec] = &[
    FieldSpec::string("address", "The wallet address to check"),
    FieldSpec::string("network", "The network to query")
        .one_of(SUPPORTED_NETWORKS)
        .with_default(Literal::Str("bnb")),
];

fn required<'a>(args: &'a Arguments, name: &str) -> Result<&'a str, PromptError> {
    args.str(name)
        .ok_or_else(|| PromptError::InvalidParams(format!("missing required argument `{name}`")))
}

fn swap_token(args: &Arguments) -> Result<PromptMessage, PromptError> {
    let input_token = required(args, "input_token_address")?;
    let output_token = required(args, "output_token_address")?;
    let input_amount = args.str("input_amount").filter(|s| !s.is_empty());
    let output_amount = args.str("output_amount").filter(|s| !s.is_empty());

    let text = match (input_amount, output_amount) {
        (Some(amount), _) => format!("I want to swap {amount} {input_token} to {output_token}."),
        (None, Some(amount)) => format!("I want to swap {input_token} to {amount} {output_token}."),
        (None, None) => {
            return Err(PromptError::InvalidParams(
                "Please provide either an input or output amount".into(),
            ))
        }
    };
    Ok(PromptMessage::user_text(text))
}

fn get_balance(args: &Arguments) -> Result<PromptMessage, PromptError> {
    let address = required(args, "address")?;
    let network = required(args, "network")?;
    Ok(PromptMessage::user_text(format!(
        "I want to get the balance of {address} on {network}."
    )))
}

/// The prompts this server ships with.
pub fn builtin_prompts() -> Vec<PromptDescriptor> {
    vec![
        PromptDescriptor {
            name: "swap-token",
            description: "Swap a token for another token",
            schema: Some(ArgumentSchema::new(SWAP_TOKEN_ARGS)),
            handler: swap_token,
        },
        PromptDescriptor {
            name: "get-balance",
            description: "Get the balance of a wallet",
            schema: Some(ArgumentSchema::new(GET_BALANCE_ARGS)),
            handler: get_balance,
        },
    ]
}

/// Immutable table of prompts, in declaration order.
#[derive(Debug, Clone)]
pub struct PromptRegistry {
    prompts: Vec<PromptDescriptor>,
}

impl PromptRegistry {
    /// Build a registry, rejecting duplicate names and malformed schemas.
    pub fn new(prompts: Vec<PromptDescriptor>) -> Result<Self, SchemaError> {
        let mut names = BTreeSet::new();
        for prompt in &prompts {
            if !names.insert(prompt.name) {
                return Err(SchemaError::DuplicateName(prompt.name.to_string()));
            }
            if let Some(schema) = &prompt.schema {
                schema.check()?;
            }
        }
        Ok(Self { prompts })
    }

    pub fn builtin() -> Result<Self, SchemaError> {
        Self::new(builtin_prompts())
    }

    pub fn get(&self, name: &str) -> Option<&PromptDescriptor> {
        self.prompts.iter().find(|p| p.name == name)
    }

    pub fn list(&self) -> Vec<PromptInfo> {
        self.prompts
            .iter()
            .map(|p| PromptInfo {
                name: p.name.to_string(),
                description: p.description.to_string(),
                arguments: p.schema.map(|s| s.arguments()),
            })
            .collect()
    }

    /// Validate `raw` against the prompt's schema and run its handler.
    /// A prompt without a schema ignores whatever arguments it is given.
    pub fn render(&self, name: &str, raw: Option<&Value>) -> Result<GetPromptResult, PromptError> {
        let prompt = self
            .get(name)
            .ok_or_else(|| PromptError::NotFound(name.to_string()))?;

        let args = match &prompt.schema {
            Some(schema) => schema.validate(raw)?,
            None => Arguments::default(),
        };

        let message = (prompt.handler)(&args)?;
        Ok(GetPromptResult {
            description: Some(prompt.description.to_string()),
            messages: vec![message],
        })
    }
}
