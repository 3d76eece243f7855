// scroll：按顺序执行的操作列表
pub mod parser;

use crate::catalog::Operation;
use crate::utils::error::BottleError;

/// One catalog operation with its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub operation: Operation,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(operation: Operation, args: Vec<String>) -> Result<Self, BottleError> {
        if args.len() != operation.arity() {
            return Err(BottleError::WrongArity {
                operation: operation.name().to_string(),
                expected: operation.arity(),
                got: args.len(),
            });
        }
        Ok(Self { operation, args })
    }
}

/// An ordered, validated sequence of invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scroll {
    invocations: Vec<Invocation>,
}

impl Scroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses scroll text, rejecting unknown operations and wrong argument counts.
    pub fn parse(text: &str) -> Result<Self, BottleError> {
        let invocations = parser::statements(text)?
            .into_iter()
            .map(|stmt| {
                let operation = Operation::from_name(&stmt.name)?;
                Invocation::new(operation, stmt.args)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { invocations })
    }

    /// Appends an invocation, builder style.
    pub fn then<I, S>(mut self, operation: Operation, args: I) -> Result<Self, BottleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = args.into_iter().map(Into::into).collect();
        self.invocations.push(Invocation::new(operation, args)?);
        Ok(self)
    }

    pub fn invocations(&self) -> &[Invocation] {
        &self.invocations
    }

    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }
}
