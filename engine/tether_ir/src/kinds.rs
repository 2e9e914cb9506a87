//! Grammar kind names the classifiers look for.

/// Node kind tags, defaulting to the Python grammar used by the tree
/// provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KindTable {
    /// Function-like constructs that bound a scope.
    pub scopes: Vec<String>,
    pub if_stmt: String,
    /// Statement block (`if` bodies and `else` branches).
    pub suite: String,
    pub string: String,
    pub number: String,
    pub param: String,
    pub try_stmt: String,
    pub except_clause: String,
    pub assert_stmt: String,
    pub expr_stmt: String,
    pub name: String,
    pub operator: String,
    /// Label of the assignment operator leaf.
    pub assign: String,
}

impl Default for KindTable {
    fn default() -> Self {
        KindTable {
            scopes: vec!["funcdef".to_string()],
            if_stmt: "if_stmt".to_string(),
            suite: "suite".to_string(),
            string: "string".to_string(),
            number: "number".to_string(),
            param: "param".to_string(),
            try_stmt: "try_stmt".to_string(),
            except_clause: "except_clause".to_string(),
            assert_stmt: "assert_stmt".to_string(),
            expr_stmt: "expr_stmt".to_string(),
            name: "name".to_string(),
            operator: "operator".to_string(),
            assign: "=".to_string(),
        }
    }
}

impl KindTable {
    /// Whether `kind` bounds a scope.
    pub fn is_scope(&self, kind: &str) -> bool {
        self.scopes.iter().any(|s| s == kind)
    }
}
