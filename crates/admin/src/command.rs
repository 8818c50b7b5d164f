//! Argument parsing for `kogebog-admin`.

use std::path::PathBuf;

use kogebog_core::model::OptionStatus;

pub const USAGE: &str = "\
Usage: kogebog-admin <command> [args...]

Commands:
  resolve <ingredient>...              Resolve ingredient names to mapping ids
  purchase-link <country> <ingredient> Show the purchase option for an ingredient
  delete-mappings <id>...              Delete mappings (and their options)
  delete-suppliers <id>...             Delete suppliers
  delete-options <id>...               Delete supplier options
  activate-options <id>...             Mark supplier options active
  deactivate-options <id>...           Mark supplier options inactive
  import <records.json>                Import mappings and options from parsed CSV rows";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("No command given")]
    MissingCommand,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command} requires {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Resolve { ingredients: Vec<String> },
    PurchaseLink { country: String, ingredient: String },
    DeleteMappings { ids: Vec<String> },
    DeleteSuppliers { ids: Vec<String> },
    DeleteOptions { ids: Vec<String> },
    SetOptionStatus { ids: Vec<String>, status: OptionStatus },
    Import { path: PathBuf },
}

impl Command {
    /// Parse arguments following the program name.
    pub fn parse<I>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let name = args.next().ok_or(UsageError::MissingCommand)?;
        let rest: Vec<String> = args.collect();

        match name.as_str() {
            "resolve" => Ok(Self::Resolve {
                ingredients: non_empty(rest, "resolve", "at least one ingredient")?,
            }),
            "purchase-link" => {
                let mut rest = rest.into_iter();
                let country = rest.next().ok_or(UsageError::MissingArgument {
                    command: "purchase-link",
                    argument: "a country code",
                })?;
                let ingredient = rest.collect::<Vec<_>>().join(" ");
                if ingredient.trim().is_empty() {
                    return Err(UsageError::MissingArgument {
                        command: "purchase-link",
                        argument: "an ingredient",
                    });
                }
                Ok(Self::PurchaseLink { country, ingredient })
            }
            "delete-mappings" => Ok(Self::DeleteMappings {
                ids: non_empty(rest, "delete-mappings", "at least one id")?,
            }),
            "delete-suppliers" => Ok(Self::DeleteSuppliers {
                ids: non_empty(rest, "delete-suppliers", "at least one id")?,
            }),
            "delete-options" => Ok(Self::DeleteOptions {
                ids: non_empty(rest, "delete-options", "at least one id")?,
            }),
            "activate-options" => Ok(Self::SetOptionStatus {
                ids: non_empty(rest, "activate-options", "at least one id")?,
                status: OptionStatus::Active,
            }),
            "deactivate-options" => Ok(Self::SetOptionStatus {
                ids: non_empty(rest, "deactivate-options", "at least one id")?,
                status: OptionStatus::Inactive,
            }),
            "import" => {
                let path = rest.into_iter().next().ok_or(UsageError::MissingArgument {
                    command: "import",
                    argument: "a records file",
                })?;
                Ok(Self::Import { path: path.into() })
            }
            other => Err(UsageError::UnknownCommand(other.to_string())),
        }
    }
}

fn non_empty(
    values: Vec<String>,
    command: &'static str,
    argument: &'static str,
) -> Result<Vec<String>, UsageError> {
    if values.is_empty() {
        Err(UsageError::MissingArgument { command, argument })
    } else {
        Ok(values)
    }
}
