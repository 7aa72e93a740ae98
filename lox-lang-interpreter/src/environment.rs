use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use log::debug;
use lox_lang_core::token::Token;

use crate::error::RuntimeError;
use crate::value::Value;

#[derive(Debug, Default)]
struct Scope {
    values: HashMap<Rc<str>, Value>,
    enclosing: Option<usize>,
}

/// Variable scopes stored in an arena. Each scope refers to its parent by
/// index; scope 0 is the global scope and is never released.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
    current: usize,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::default()],
            current: 0,
        }
    }

    /// Opens a scope nested in the current one. It stays current until the
    /// returned guard is dropped.
    pub fn enter_scope(&mut self) -> ScopeGuard<'_> {
        let previous = self.current;
        self.scopes.push(Scope {
            values: HashMap::new(),
            enclosing: Some(previous),
        });
        self.current = self.scopes.len() - 1;
        debug!("entered scope {}", self.current);

        ScopeGuard {
            environment: self,
            previous,
        }
    }

    /// Number of scopes between the current one and the global scope,
    /// counting both.
    #[cfg(test)]
    fn depth(&self) -> usize {
        let mut depth = 0;
        let mut index = Some(self.current);
        while let Some(scope) = index.and_then(|index| self.scopes.get(index)) {
            depth += 1;
            index = scope.enclosing;
        }
        depth
    }

    fn resolve(&self, name: &str) -> Option<usize> {
        let mut index = Some(self.current);
        while let Some(current) = index {
            let scope = self.scopes.get(current)?;
            if scope.values.contains_key(name) {
                return Some(current);
            }
            index = scope.enclosing;
        }
        None
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        self.resolve(&name.lexeme)
            .and_then(|index| self.scopes.get(index))
            .and_then(|scope| scope.values.get(name.lexeme.as_ref()))
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_variable(name))
    }

    /// Overwrites the nearest existing binding. Never declares.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        let slot = self
            .resolve(&name.lexeme)
            .and_then(|index| self.scopes.get_mut(index))
            .and_then(|scope| scope.values.get_mut(name.lexeme.as_ref()));

        match slot {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RuntimeError::undefined_variable(name)),
        }
    }

    pub fn define(&mut self, name: Rc<str>, value: Value) {
        if let Some(scope) = self.scopes.get_mut(self.current) {
            scope.values.insert(name, value);
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases its scope on drop, whichever way the block was left.
pub struct ScopeGuard<'a> {
    environment: &'a mut Environment,
    previous: usize,
}

impl Deref for ScopeGuard<'_> {
    type Target = Environment;

    fn deref(&self) -> &Environment {
        self.environment
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Environment {
        self.environment
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        debug!("left scope {}", self.environment.current);
        self.environment.scopes.truncate(self.environment.current);
        self.environment.current = self.previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lox_lang_core::token::TokenKind;

    fn name(lexeme: &str) -> Token {
        Token::new(TokenKind::Identifier, lexeme, 1)
    }

    #[test]
    fn test_define_and_get() {
        let mut environment = Environment::new();
        environment.define("a".into(), Value::Number(1.0));
        environment.define("a".into(), Value::Number(2.0));

        assert_eq!(environment.get(&name("a")).unwrap(), Value::Number(2.0));
        assert!(matches!(
            environment.get(&name("b")),
            Err(RuntimeError::UndefinedVariable { .. })
        ));
    }

    #[test]
    fn test_shadowing() {
        let mut environment = Environment::new();
        environment.define("a".into(), Value::String("outer".into()));
        {
            let mut inner = environment.enter_scope();
            inner.define("a".into(), Value::String("inner".into()));
            assert_eq!(inner.get(&name("a")).unwrap(), Value::String("inner".into()));
            assert_eq!(inner.depth(), 2);
        }

        assert_eq!(
            environment.get(&name("a")).unwrap(),
            Value::String("outer".into())
        );
        assert_eq!(environment.depth(), 1);
    }

    #[test]
    fn test_assign_reaches_enclosing_scope() {
        let mut environment = Environment::new();
        environment.define("a".into(), Value::Number(1.0));
        {
            let mut outer = environment.enter_scope();
            let mut inner = outer.enter_scope();
            inner.assign(&name("a"), Value::Number(5.0)).unwrap();
            assert!(matches!(
                inner.assign(&name("missing"), Value::Nil),
                Err(RuntimeError::UndefinedVariable { .. })
            ));
        }

        assert_eq!(environment.get(&name("a")).unwrap(), Value::Number(5.0));
        assert!(environment.get(&name("missing")).is_err());
    }

    #[test]
    fn test_scope_released_on_early_return() {
        fn fails(environment: &mut Environment) -> Result<Value, RuntimeError> {
            let mut scope = environment.enter_scope();
            scope.define("temporary".into(), Value::Boolean(true));
            scope.get(&name("missing"))
        }

        let mut environment = Environment::new();
        assert!(fails(&mut environment).is_err());
        assert_eq!(environment.depth(), 1);
        assert!(environment.get(&name("temporary")).is_err());
    }
}
