use std::fmt;

/// The catalog request that failed, for error messages and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListRecipes,
    UpdateRecipe,
    ListGroceries,
    AddGrocery,
    DeleteGrocery,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::ListRecipes => "fetch recipes",
            Operation::UpdateRecipe => "update recipe",
            Operation::ListGroceries => "fetch groceries",
            Operation::AddGrocery => "add grocery",
            Operation::DeleteGrocery => "delete grocery",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to {operation}: server returned HTTP {status}")]
    Status { operation: Operation, status: u16 },
    #[error("Failed to {operation}: {message}")]
    Transport { operation: Operation, message: String },
}

impl ApiError {
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            ApiError::Status { operation, .. } | ApiError::Transport { operation, .. } => {
                *operation
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HouseholdError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("No recipe found for '{0}'")]
    UnknownRecipe(String),
    #[error("No grocery found for '{0}'")]
    UnknownGrocery(String),
    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_messages() {
        let err = ApiError::Status {
            operation: Operation::DeleteGrocery,
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Failed to delete grocery: server returned HTTP 404"
        );
        assert_eq!(err.operation(), Operation::DeleteGrocery);

        let err = ApiError::Transport {
            operation: Operation::ListRecipes,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to fetch recipes: connection refused");
    }

    #[test]
    fn test_household_error_wraps_api_error() {
        let err: HouseholdError = ApiError::Status {
            operation: Operation::AddGrocery,
            status: 500,
        }
        .into();
        assert_eq!(err.to_string(), "Failed to add grocery: server returned HTTP 500");
    }
}
