//! Typed AST wrappers over the untyped rowan CST.
//!
//! This module provides strongly-typed accessors for configuration syntax
//! nodes. Each struct wraps a SyntaxNode and provides methods to access
//! children: route names, modparam arguments, assignment sides, string
//! interpolation parts.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    fn text(&self) -> String {
        self.syntax().text().to_string()
    }
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

fn first_token_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == kind)
}

// ============================================================================
// Root
// ============================================================================

ast_node!(ConfigFile, CONFIG_FILE);

impl ConfigFile {
    pub fn items(&self) -> impl Iterator<Item = ConfigItem> + '_ {
        self.0.children().filter_map(ConfigItem::cast)
    }

    /// All route declarations in the file, in source order
    pub fn routes(&self) -> impl Iterator<Item = RouteDeclaration> + '_ {
        self.0.children().filter_map(RouteDeclaration::cast)
    }

    pub fn directives(&self) -> impl Iterator<Item = Directive> + '_ {
        self.0.children().filter_map(Directive::cast)
    }
}

// ============================================================================
// Top-level items
// ============================================================================

/// Any top-level item of a configuration file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfigItem {
    Directive(Directive),
    Assignment(TopLevelAssignment),
    LoadModule(LoadModule),
    LoadPath(LoadPath),
    IncludeFile(IncludeFile),
    Modparam(Modparam),
    Route(RouteDeclaration),
}

impl AstNode for ConfigItem {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::PREPROC_DIRECTIVE
                | SyntaxKind::TOP_LEVEL_ASSIGNMENT
                | SyntaxKind::LOAD_MODULE
                | SyntaxKind::LOAD_PATH
                | SyntaxKind::INCLUDE_FILE
                | SyntaxKind::MODPARAM
                | SyntaxKind::ROUTE_DECLARATION
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::PREPROC_DIRECTIVE => Some(Self::Directive(Directive(node))),
            SyntaxKind::TOP_LEVEL_ASSIGNMENT => Some(Self::Assignment(TopLevelAssignment(node))),
            SyntaxKind::LOAD_MODULE => Some(Self::LoadModule(LoadModule(node))),
            SyntaxKind::LOAD_PATH => Some(Self::LoadPath(LoadPath(node))),
            SyntaxKind::INCLUDE_FILE => Some(Self::IncludeFile(IncludeFile(node))),
            SyntaxKind::MODPARAM => Some(Self::Modparam(Modparam(node))),
            SyntaxKind::ROUTE_DECLARATION => Some(Self::Route(RouteDeclaration(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Directive(n) => n.syntax(),
            Self::Assignment(n) => n.syntax(),
            Self::LoadModule(n) => n.syntax(),
            Self::LoadPath(n) => n.syntax(),
            Self::IncludeFile(n) => n.syntax(),
            Self::Modparam(n) => n.syntax(),
            Self::Route(n) => n.syntax(),
        }
    }
}

ast_node!(Directive, PREPROC_DIRECTIVE);

impl Directive {
    /// The directive keyword: `define` for `#!define VAR 1`.
    /// Dialect markers (`#!KAMAILIO`) count as their own keyword.
    pub fn keyword(&self) -> Option<String> {
        let text = self.text();
        let rest = text.strip_prefix("#!")?;
        let word: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        (!word.is_empty()).then_some(word)
    }

    /// Whether the keyword is one the preprocessor cookbook documents
    pub fn is_known(&self) -> bool {
        self.keyword()
            .is_some_and(|word| super::keywords::is_directive_keyword(&word))
    }

    /// Everything after the keyword, trimmed: `VAR 1` for `#!define VAR 1`
    pub fn argument_text(&self) -> Option<String> {
        let text = self.text();
        let rest = text.strip_prefix("#!")?;
        let keyword_len = self.keyword()?.len();
        let args = rest[keyword_len..].trim();
        (!args.is_empty()).then(|| args.to_string())
    }
}

ast_node!(TopLevelAssignment, TOP_LEVEL_ASSIGNMENT);

impl TopLevelAssignment {
    /// The core parameter name on the left of `=`
    pub fn key(&self) -> Option<SyntaxToken> {
        first_token_of_kind(&self.0, SyntaxKind::IDENT)
    }

    pub fn value(&self) -> Option<ParamValue> {
        self.0.children().find_map(ParamValue::cast)
    }
}

ast_node!(ParamValue, PARAM_VALUE);

impl ParamValue {
    /// The raw value text with surrounding whitespace removed
    pub fn value_text(&self) -> String {
        self.text().trim().to_string()
    }
}

ast_node!(LoadModule, LOAD_MODULE);
ast_node!(LoadPath, LOAD_PATH);
ast_node!(IncludeFile, INCLUDE_FILE);

impl LoadModule {
    /// The quoted module path: `tm.so` for `loadmodule "tm.so"`
    pub fn path(&self) -> Option<String> {
        self.0
            .children()
            .find_map(StringLit::cast)
            .map(|s| s.content_text())
    }
}

impl LoadPath {
    pub fn path(&self) -> Option<String> {
        self.0
            .children()
            .find_map(StringLit::cast)
            .map(|s| s.content_text())
    }
}

impl IncludeFile {
    pub fn path(&self) -> Option<String> {
        self.0
            .children()
            .find_map(StringLit::cast)
            .map(|s| s.content_text())
    }
}

ast_node!(Modparam, MODPARAM);

impl Modparam {
    pub fn args(&self) -> Option<ArgumentList> {
        self.0.children().find_map(ArgumentList::cast)
    }

    fn string_arg(&self, index: usize) -> Option<String> {
        let args = self.args()?;
        let expr = args.args().nth(index)?;
        match expr {
            Expr::String(s) => Some(s.content_text()),
            _ => None,
        }
    }

    /// The target module: `tm` for `modparam("tm", "fr_timer", 30000)`
    pub fn module(&self) -> Option<String> {
        self.string_arg(0)
    }

    /// The parameter name: `fr_timer`
    pub fn parameter(&self) -> Option<String> {
        self.string_arg(1)
    }
}

// ============================================================================
// Routes
// ============================================================================

ast_node!(RouteDeclaration, ROUTE_DECLARATION);

impl RouteDeclaration {
    /// The route keyword token (`request_route`, `failure_route`, ...)
    pub fn keyword(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| token.kind().is_route_keyword())
    }

    /// The bracketed name, without the brackets: `RELAY` for `route[RELAY]`
    pub fn name(&self) -> Option<String> {
        let name_node = self
            .0
            .children()
            .find(|child| child.kind() == SyntaxKind::ROUTE_NAME)?;
        let text: String = name_node
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .filter(|token| {
                !matches!(token.kind(), SyntaxKind::L_BRACKET | SyntaxKind::R_BRACKET)
            })
            .map(|token| token.text().to_string())
            .collect();
        let text = text.trim().to_string();
        (!text.is_empty()).then_some(text)
    }

    pub fn body(&self) -> Option<CompoundStatement> {
        self.0.children().find_map(CompoundStatement::cast)
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Any statement inside a route body
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    Compound(CompoundStatement),
    If(IfStatement),
    While(WhileStatement),
    Switch(SwitchStatement),
    Return(ReturnStatement),
    Break(BreakStatement),
    Exit(ExitStatement),
    Drop(DropStatement),
    RouteCall(RouteCallStatement),
    Expr(ExpressionStatement),
    Directive(Directive),
}

impl AstNode for Statement {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::COMPOUND_STATEMENT
                | SyntaxKind::IF_STATEMENT
                | SyntaxKind::WHILE_STATEMENT
                | SyntaxKind::SWITCH_STATEMENT
                | SyntaxKind::RETURN_STATEMENT
                | SyntaxKind::BREAK_STATEMENT
                | SyntaxKind::EXIT_STATEMENT
                | SyntaxKind::DROP_STATEMENT
                | SyntaxKind::ROUTE_CALL_STATEMENT
                | SyntaxKind::EXPRESSION_STATEMENT
                | SyntaxKind::PREPROC_DIRECTIVE
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::COMPOUND_STATEMENT => Some(Self::Compound(CompoundStatement(node))),
            SyntaxKind::IF_STATEMENT => Some(Self::If(IfStatement(node))),
            SyntaxKind::WHILE_STATEMENT => Some(Self::While(WhileStatement(node))),
            SyntaxKind::SWITCH_STATEMENT => Some(Self::Switch(SwitchStatement(node))),
            SyntaxKind::RETURN_STATEMENT => Some(Self::Return(ReturnStatement(node))),
            SyntaxKind::BREAK_STATEMENT => Some(Self::Break(BreakStatement(node))),
            SyntaxKind::EXIT_STATEMENT => Some(Self::Exit(ExitStatement(node))),
            SyntaxKind::DROP_STATEMENT => Some(Self::Drop(DropStatement(node))),
            SyntaxKind::ROUTE_CALL_STATEMENT => Some(Self::RouteCall(RouteCallStatement(node))),
            SyntaxKind::EXPRESSION_STATEMENT => Some(Self::Expr(ExpressionStatement(node))),
            SyntaxKind::PREPROC_DIRECTIVE => Some(Self::Directive(Directive(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Compound(n) => n.syntax(),
            Self::If(n) => n.syntax(),
            Self::While(n) => n.syntax(),
            Self::Switch(n) => n.syntax(),
            Self::Return(n) => n.syntax(),
            Self::Break(n) => n.syntax(),
            Self::Exit(n) => n.syntax(),
            Self::Drop(n) => n.syntax(),
            Self::RouteCall(n) => n.syntax(),
            Self::Expr(n) => n.syntax(),
            Self::Directive(n) => n.syntax(),
        }
    }
}

ast_node!(CompoundStatement, COMPOUND_STATEMENT);

impl CompoundStatement {
    pub fn statements(&self) -> impl Iterator<Item = Statement> + '_ {
        self.0.children().filter_map(Statement::cast)
    }
}

ast_node!(IfStatement, IF_STATEMENT);

impl IfStatement {
    pub fn condition(&self) -> Option<ParenExpr> {
        self.0.children().find_map(ParenExpr::cast)
    }

    pub fn then_branch(&self) -> Option<Statement> {
        self.0.children().find_map(Statement::cast)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        self.0.children().find_map(ElseClause::cast)
    }
}

ast_node!(ElseClause, ELSE_CLAUSE);

impl ElseClause {
    pub fn body(&self) -> Option<Statement> {
        self.0.children().find_map(Statement::cast)
    }
}

ast_node!(WhileStatement, WHILE_STATEMENT);

impl WhileStatement {
    pub fn condition(&self) -> Option<ParenExpr> {
        self.0.children().find_map(ParenExpr::cast)
    }

    pub fn body(&self) -> Option<Statement> {
        self.0.children().find_map(Statement::cast)
    }
}

ast_node!(SwitchStatement, SWITCH_STATEMENT);

impl SwitchStatement {
    pub fn subject(&self) -> Option<ParenExpr> {
        self.0.children().find_map(ParenExpr::cast)
    }

    pub fn cases(&self) -> impl Iterator<Item = CaseClause> + '_ {
        self.0.children().filter_map(CaseClause::cast)
    }

    pub fn default_clause(&self) -> Option<DefaultClause> {
        self.0.children().find_map(DefaultClause::cast)
    }
}

ast_node!(CaseClause, CASE_CLAUSE);

impl CaseClause {
    pub fn statements(&self) -> impl Iterator<Item = Statement> + '_ {
        self.0.children().filter_map(Statement::cast)
    }
}

ast_node!(DefaultClause, DEFAULT_CLAUSE);

impl DefaultClause {
    pub fn statements(&self) -> impl Iterator<Item = Statement> + '_ {
        self.0.children().filter_map(Statement::cast)
    }
}

ast_node!(ReturnStatement, RETURN_STATEMENT);

impl ReturnStatement {
    pub fn value(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

ast_node!(BreakStatement, BREAK_STATEMENT);
ast_node!(ExitStatement, EXIT_STATEMENT);
ast_node!(DropStatement, DROP_STATEMENT);

ast_node!(RouteCallStatement, ROUTE_CALL_STATEMENT);

impl RouteCallStatement {
    /// The invoked route name: `RELAY` for `route(RELAY);`
    pub fn target(&self) -> Option<String> {
        let mut inside = false;
        let mut out = String::new();
        for element in self.0.children_with_tokens() {
            match element.kind() {
                SyntaxKind::L_PAREN => inside = true,
                SyntaxKind::R_PAREN => break,
                _ if inside => out.push_str(&element_text(&element)),
                _ => {}
            }
        }
        let out = out.trim().to_string();
        (!out.is_empty()).then_some(out)
    }
}

fn element_text(element: &super::SyntaxElement) -> String {
    match element {
        rowan::NodeOrToken::Node(node) => node.text().to_string(),
        rowan::NodeOrToken::Token(token) => token.text().to_string(),
    }
}

ast_node!(ExpressionStatement, EXPRESSION_STATEMENT);

impl ExpressionStatement {
    pub fn expr(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// Any composite expression node. Bare literal tokens (a lone number in
/// `return 1;`) are leaves, not nodes, and are reached through the syntax
/// tree directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Assignment(AssignmentExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Paren(ParenExpr),
    Call(CallExpr),
    Pvar(PseudoVariable),
    String(StringLit),
}

impl AstNode for Expr {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::ASSIGNMENT_EXPR
                | SyntaxKind::BINARY_EXPR
                | SyntaxKind::UNARY_EXPR
                | SyntaxKind::PAREN_EXPR
                | SyntaxKind::CALL_EXPR
                | SyntaxKind::PSEUDO_VARIABLE
                | SyntaxKind::STRING
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::ASSIGNMENT_EXPR => Some(Self::Assignment(AssignmentExpr(node))),
            SyntaxKind::BINARY_EXPR => Some(Self::Binary(BinaryExpr(node))),
            SyntaxKind::UNARY_EXPR => Some(Self::Unary(UnaryExpr(node))),
            SyntaxKind::PAREN_EXPR => Some(Self::Paren(ParenExpr(node))),
            SyntaxKind::CALL_EXPR => Some(Self::Call(CallExpr(node))),
            SyntaxKind::PSEUDO_VARIABLE => Some(Self::Pvar(PseudoVariable(node))),
            SyntaxKind::STRING => Some(Self::String(StringLit(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Assignment(n) => n.syntax(),
            Self::Binary(n) => n.syntax(),
            Self::Unary(n) => n.syntax(),
            Self::Paren(n) => n.syntax(),
            Self::Call(n) => n.syntax(),
            Self::Pvar(n) => n.syntax(),
            Self::String(n) => n.syntax(),
        }
    }
}

ast_node!(AssignmentExpr, ASSIGNMENT_EXPR);

impl AssignmentExpr {
    pub fn op_token(&self) -> Option<SyntaxToken> {
        first_token_of_kind(&self.0, SyntaxKind::EQ)
    }

    /// The assigned-to expression, commonly a pseudo-variable
    pub fn lhs(&self) -> Option<Expr> {
        let op = self.op_token()?;
        self.0
            .children()
            .take_while(|child| child.text_range().start() < op.text_range().start())
            .find_map(Expr::cast)
    }

    pub fn rhs(&self) -> Option<Expr> {
        let op = self.op_token()?;
        self.0
            .children()
            .skip_while(|child| child.text_range().start() < op.text_range().start())
            .find_map(Expr::cast)
    }
}

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    /// The operator token between the operands
    pub fn op_token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| token.kind().is_punct())
    }

    pub fn lhs(&self) -> Option<Expr> {
        let op = self.op_token()?;
        self.0
            .children()
            .take_while(|child| child.text_range().start() < op.text_range().start())
            .find_map(Expr::cast)
    }

    pub fn rhs(&self) -> Option<Expr> {
        let op = self.op_token()?;
        self.0
            .children()
            .skip_while(|child| child.text_range().start() < op.text_range().start())
            .find_map(Expr::cast)
    }
}

ast_node!(UnaryExpr, UNARY_EXPR);

impl UnaryExpr {
    pub fn op_token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| {
                matches!(
                    token.kind(),
                    SyntaxKind::BANG | SyntaxKind::MINUS | SyntaxKind::PLUS
                )
            })
    }

    pub fn operand(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    /// The called function name, an opaque module export
    pub fn callee(&self) -> Option<SyntaxToken> {
        first_token_of_kind(&self.0, SyntaxKind::IDENT)
    }

    pub fn args(&self) -> Option<ArgumentList> {
        self.0.children().find_map(ArgumentList::cast)
    }
}

ast_node!(ArgumentList, ARGUMENT_LIST);

impl ArgumentList {
    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

ast_node!(PseudoVariable, PSEUDO_VARIABLE);

impl PseudoVariable {
    /// The variable class name: `avp` for `$avp(s:x)`, `hdr` for
    /// `$(hdr(From)[0])`, `ru` for `$ru`
    pub fn name(&self) -> Option<String> {
        let text = self.text();
        let rest = text.strip_prefix('$')?;
        let rest = rest.strip_prefix('(').unwrap_or(rest);
        let name: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        (!name.is_empty()).then_some(name)
    }
}

ast_node!(StringLit, STRING);

/// One piece of a string literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StringPart {
    /// Literal text
    Literal(SyntaxToken),
    /// An interpolated pseudo-variable
    Var(PseudoVariable),
    /// The `$$` escape
    Escape(SyntaxToken),
}

impl StringLit {
    /// The pieces between the quotes, in order
    pub fn parts(&self) -> impl Iterator<Item = StringPart> + '_ {
        self.0.children_with_tokens().filter_map(|element| {
            match element {
                rowan::NodeOrToken::Node(node) => PseudoVariable::cast(node).map(StringPart::Var),
                rowan::NodeOrToken::Token(token) => match token.kind() {
                    SyntaxKind::STRING_CONTENT => Some(StringPart::Literal(token)),
                    SyntaxKind::DOLLAR_ESCAPE => Some(StringPart::Escape(token)),
                    _ => None,
                },
            }
        })
    }

    /// The literal content with quotes stripped; interpolations and the
    /// `$$` escape keep their source spelling
    pub fn content_text(&self) -> String {
        self.parts()
            .map(|part| match part {
                StringPart::Literal(token) => token.text().to_string(),
                StringPart::Var(pvar) => pvar.text(),
                StringPart::Escape(token) => token.text().to_string(),
            })
            .collect()
    }

    /// Whether the string interpolates any pseudo-variable
    pub fn has_interpolation(&self) -> bool {
        self.parts().any(|part| matches!(part, StringPart::Var(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::parser::parse;
    use super::*;

    fn config(input: &str) -> ConfigFile {
        ConfigFile::cast(parse(input).syntax()).expect("root is a config file")
    }

    #[test]
    fn test_route_name_extraction() {
        let file = config("route[RELAY] {\n    t_relay();\n}\n");
        let route = file.routes().next().unwrap();
        assert_eq!(route.name().as_deref(), Some("RELAY"));
        assert_eq!(route.keyword().unwrap().text(), "route");
        assert!(route.body().is_some());
    }

    #[test]
    fn test_event_route_name_with_punctuation() {
        let file = config("event_route[tm:local-request] { exit; }\n");
        let route = file.routes().next().unwrap();
        assert_eq!(route.name().as_deref(), Some("tm:local-request"));
    }

    #[test]
    fn test_unnamed_request_route() {
        let file = config("request_route { exit; }\n");
        let route = file.routes().next().unwrap();
        assert_eq!(route.name(), None);
        assert_eq!(route.keyword().unwrap().text(), "request_route");
    }

    #[test]
    fn test_directive_accessors() {
        let file = config("#!define WITH_NAT 1\n#!KAMAILIO\n");
        let directives: Vec<_> = file.directives().collect();
        assert_eq!(directives[0].keyword().as_deref(), Some("define"));
        assert_eq!(directives[0].argument_text().as_deref(), Some("WITH_NAT 1"));
        assert!(directives[0].is_known());
        assert_eq!(directives[1].keyword().as_deref(), Some("KAMAILIO"));
        assert_eq!(directives[1].argument_text(), None);
    }

    #[test]
    fn test_top_level_assignment_key_value() {
        let file = config("listen=udp:10.0.0.1:5060\n");
        let Some(ConfigItem::Assignment(assignment)) = file.items().next() else {
            panic!("expected an assignment");
        };
        assert_eq!(assignment.key().unwrap().text(), "listen");
        assert_eq!(assignment.value().unwrap().value_text(), "udp:10.0.0.1:5060");
    }

    #[test]
    fn test_loadmodule_path() {
        let file = config("loadmodule \"tm.so\"\n");
        let Some(ConfigItem::LoadModule(load)) = file.items().next() else {
            panic!("expected loadmodule");
        };
        assert_eq!(load.path().as_deref(), Some("tm.so"));
    }

    #[test]
    fn test_modparam_accessors() {
        let file = config("modparam(\"registrar\", \"max_expires\", 3600)\n");
        let Some(ConfigItem::Modparam(mp)) = file.items().next() else {
            panic!("expected modparam");
        };
        assert_eq!(mp.module().as_deref(), Some("registrar"));
        assert_eq!(mp.parameter().as_deref(), Some("max_expires"));
        assert_eq!(mp.args().unwrap().args().count(), 2);
    }

    #[test]
    fn test_assignment_sides() {
        let file = config("request_route { $var(x) = $var(x) + 1; }\n");
        let route = file.routes().next().unwrap();
        let Some(Statement::Expr(stmt)) = route.body().unwrap().statements().next() else {
            panic!("expected an expression statement");
        };
        let Some(Expr::Assignment(assign)) = stmt.expr() else {
            panic!("expected an assignment");
        };
        let Some(Expr::Pvar(lhs)) = assign.lhs() else {
            panic!("expected a pseudo-variable on the left");
        };
        assert_eq!(lhs.name().as_deref(), Some("var"));
        assert!(matches!(assign.rhs(), Some(Expr::Binary(_))));
    }

    #[test]
    fn test_if_else_shape() {
        let file = config(
            "request_route { if ($rm == \"INVITE\") { exit; } else { drop; } }\n",
        );
        let route = file.routes().next().unwrap();
        let Some(Statement::If(if_stmt)) = route.body().unwrap().statements().next() else {
            panic!("expected an if statement");
        };
        assert!(if_stmt.condition().is_some());
        assert!(matches!(if_stmt.then_branch(), Some(Statement::Compound(_))));
        let else_clause = if_stmt.else_clause().unwrap();
        assert!(matches!(else_clause.body(), Some(Statement::Compound(_))));
    }

    #[test]
    fn test_string_parts() {
        let file = config("request_route { xlog(\"caller: $fU done\"); }\n");
        let route = file.routes().next().unwrap();
        let Some(Statement::Expr(stmt)) = route.body().unwrap().statements().next() else {
            panic!("expected an expression statement");
        };
        let Some(Expr::Call(call)) = stmt.expr() else {
            panic!("expected a call");
        };
        assert_eq!(call.callee().unwrap().text(), "xlog");
        let Some(Expr::String(string)) = call.args().unwrap().args().next() else {
            panic!("expected a string argument");
        };
        assert!(string.has_interpolation());
        let parts: Vec<_> = string.parts().collect();
        assert_eq!(parts.len(), 3);
        assert!(matches!(&parts[0], StringPart::Literal(t) if t.text() == "caller: "));
        assert!(matches!(&parts[1], StringPart::Var(v) if v.name().as_deref() == Some("fU")));
        assert!(matches!(&parts[2], StringPart::Literal(t) if t.text() == " done"));
    }

    #[test]
    fn test_route_call_target() {
        let file = config("request_route { route(RELAY); }\n");
        let route = file.routes().next().unwrap();
        let Some(Statement::RouteCall(call)) = route.body().unwrap().statements().next() else {
            panic!("expected a route call");
        };
        assert_eq!(call.target().as_deref(), Some("RELAY"));
    }

    #[test]
    fn test_switch_cases() {
        let source = r#"
request_route {
    switch ($rU) {
        case "1":
            sl_send_reply("404", "one");
            break;
        case "2":
            break;
        default:
            exit;
    }
}
"#;
        let file = config(source);
        let route = file.routes().next().unwrap();
        let Some(Statement::Switch(switch)) = route.body().unwrap().statements().next() else {
            panic!("expected a switch");
        };
        assert_eq!(switch.cases().count(), 2);
        assert!(switch.default_clause().is_some());
        assert_eq!(switch.cases().next().unwrap().statements().count(), 2);
    }
}
