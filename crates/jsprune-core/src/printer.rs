//! JavaScript text for program trees.
//!
//! Used for the `snippet` of unreachable-statement diagnostics and for
//! reading cleaner output in tests and the CLI. The printer is not a
//! formatter: it emits one canonical layout and parenthesizes by operator
//! precedence, so printed output re-parses to the same tree shape.

use crate::ast::{
    ArrayElement, BinaryOp, Expression, ExpressionKind, ForHead, ForInit, Function, FunctionBody,
    Literal, LogicalOp, MemberProperty, ObjectMember, Pattern, PatternKind, Program, PropertyKey,
    Statement, StatementKind, UnaryOp, UpdateOp, VariableDeclaration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintStyle {
    /// One statement per line, two-space indentation
    #[default]
    Pretty,
    /// Everything on a single line
    Compact,
}

/// Pretty-print a whole program, one top-level statement per line
pub fn print_program(program: &Program) -> String {
    Printer::new(PrintStyle::Pretty).print_program(program)
}

/// Print a whole program on a single line
pub fn print_compact(program: &Program) -> String {
    Printer::new(PrintStyle::Compact).print_program(program)
}

/// Single-line rendering of one statement
pub fn statement_snippet(stmt: &Statement) -> String {
    let mut printer = Printer::new(PrintStyle::Compact);
    printer.print_statement(stmt);
    printer.output
}

pub fn expression_to_string(expr: &Expression) -> String {
    let mut printer = Printer::new(PrintStyle::Compact);
    printer.print_expression(expr, prec::SEQUENCE);
    printer.output
}

mod prec {
    pub const SEQUENCE: u8 = 1;
    pub const ASSIGNMENT: u8 = 2;
    pub const CONDITIONAL: u8 = 3;
    pub const NULLISH: u8 = 4;
    pub const OR: u8 = 4;
    pub const AND: u8 = 5;
    pub const BIT_OR: u8 = 6;
    pub const BIT_XOR: u8 = 7;
    pub const BIT_AND: u8 = 8;
    pub const EQUALITY: u8 = 9;
    pub const RELATIONAL: u8 = 10;
    pub const SHIFT: u8 = 11;
    pub const ADDITIVE: u8 = 12;
    pub const MULTIPLICATIVE: u8 = 13;
    pub const EXPONENT: u8 = 14;
    pub const UNARY: u8 = 15;
    pub const POSTFIX: u8 = 16;
    pub const CALL: u8 = 17;
    pub const PRIMARY: u8 = 18;
}

pub struct Printer {
    output: String,
    indent_level: usize,
    indent_str: &'static str,
    style: PrintStyle,
}

impl Printer {
    pub fn new(style: PrintStyle) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_str: "  ",
            style,
        }
    }

    pub fn print_program(mut self, program: &Program) -> String {
        for (i, stmt) in program.body.iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            self.print_statement(stmt);
        }
        if self.style == PrintStyle::Pretty && !program.body.is_empty() {
            self.output.push('\n');
        }
        self.output
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(self.indent_str);
        }
    }

    /// Line break in pretty output, a single space in compact output
    fn newline(&mut self) {
        match self.style {
            PrintStyle::Pretty => {
                self.output.push('\n');
                self.write_indent();
            }
            PrintStyle::Compact => self.output.push(' '),
        }
    }

    // ----- statements -----

    pub fn print_statement(&mut self, stmt: &Statement) {
        match &stmt.kind {
            StatementKind::Expression { expression } => {
                if starts_ambiguously(expression) {
                    self.write("(");
                    self.print_expression(expression, prec::SEQUENCE);
                    self.write(")");
                } else {
                    self.print_expression(expression, prec::SEQUENCE);
                }
                self.write(";");
            }
            StatementKind::Block(block) => self.print_block(&block.body),
            StatementKind::Empty => self.write(";"),
            StatementKind::If(if_stmt) => {
                self.write("if (");
                self.print_expression(&if_stmt.test, prec::SEQUENCE);
                self.write(") ");
                match &if_stmt.alternate {
                    None => self.print_statement(&if_stmt.consequent),
                    Some(alternate) => {
                        if ends_with_open_if(&if_stmt.consequent) {
                            self.print_block(std::slice::from_ref(&*if_stmt.consequent));
                        } else {
                            self.print_statement(&if_stmt.consequent);
                        }
                        if matches!(if_stmt.consequent.kind, StatementKind::Block(_))
                            || ends_with_open_if(&if_stmt.consequent)
                        {
                            self.write(" ");
                        } else {
                            self.newline();
                        }
                        self.write("else ");
                        self.print_statement(alternate);
                    }
                }
            }
            StatementKind::Switch(switch) => {
                self.write("switch (");
                self.print_expression(&switch.discriminant, prec::SEQUENCE);
                self.write(") ");
                if switch.cases.is_empty() {
                    self.write("{}");
                    return;
                }
                self.write("{");
                self.indent();
                for case in &switch.cases {
                    self.newline();
                    match &case.test {
                        Some(test) => {
                            self.write("case ");
                            self.print_expression(test, prec::SEQUENCE);
                            self.write(":");
                        }
                        None => self.write("default:"),
                    }
                    self.indent();
                    for stmt in &case.consequent {
                        self.newline();
                        self.print_statement(stmt);
                    }
                    self.dedent();
                }
                self.dedent();
                self.newline();
                self.write("}");
            }
            StatementKind::Return { argument } => {
                self.write("return");
                if let Some(argument) = argument {
                    self.write(" ");
                    self.print_expression(argument, prec::SEQUENCE);
                }
                self.write(";");
            }
            StatementKind::Throw { argument } => {
                self.write("throw ");
                self.print_expression(argument, prec::SEQUENCE);
                self.write(";");
            }
            StatementKind::Break { label } | StatementKind::Continue { label } => {
                let keyword = if matches!(stmt.kind, StatementKind::Break { .. }) {
                    "break"
                } else {
                    "continue"
                };
                self.write(keyword);
                if let Some(label) = label {
                    self.write(" ");
                    self.write(&label.name);
                }
                self.write(";");
            }
            StatementKind::Variable(decl) => {
                self.print_variable_declaration(decl);
                self.write(";");
            }
            StatementKind::Function(func) => self.print_function(func),
            StatementKind::While(while_stmt) => {
                self.write("while (");
                self.print_expression(&while_stmt.test, prec::SEQUENCE);
                self.write(") ");
                self.print_statement(&while_stmt.body);
            }
            StatementKind::DoWhile(while_stmt) => {
                self.write("do ");
                self.print_statement(&while_stmt.body);
                self.write(" while (");
                self.print_expression(&while_stmt.test, prec::SEQUENCE);
                self.write(");");
            }
            StatementKind::For(for_stmt) => {
                self.write("for (");
                match &for_stmt.init {
                    Some(ForInit::Variable(decl)) => self.print_variable_declaration(decl),
                    Some(ForInit::Expression(expr)) => self.print_expression(expr, prec::SEQUENCE),
                    None => {}
                }
                self.write(";");
                if let Some(test) = &for_stmt.test {
                    self.write(" ");
                    self.print_expression(test, prec::SEQUENCE);
                }
                self.write(";");
                if let Some(update) = &for_stmt.update {
                    self.write(" ");
                    self.print_expression(update, prec::SEQUENCE);
                }
                self.write(") ");
                self.print_statement(&for_stmt.body);
            }
            StatementKind::ForIn(for_in) | StatementKind::ForOf(for_in) => {
                self.write("for (");
                match &for_in.left {
                    ForHead::Variable(decl) => self.print_variable_declaration(decl),
                    ForHead::Pattern(pat) => self.print_pattern(pat),
                }
                if matches!(stmt.kind, StatementKind::ForIn(_)) {
                    self.write(" in ");
                } else {
                    self.write(" of ");
                }
                self.print_expression(&for_in.right, prec::ASSIGNMENT);
                self.write(") ");
                self.print_statement(&for_in.body);
            }
            StatementKind::Try(try_stmt) => {
                self.write("try ");
                self.print_block(&try_stmt.block.body);
                if let Some(handler) = &try_stmt.handler {
                    self.write(" catch ");
                    if let Some(param) = &handler.param {
                        self.write("(");
                        self.print_pattern(param);
                        self.write(") ");
                    }
                    self.print_block(&handler.body.body);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.write(" finally ");
                    self.print_block(&finalizer.body);
                }
            }
            StatementKind::Labeled(labeled) => {
                self.write(&labeled.label.name);
                self.write(": ");
                self.print_statement(&labeled.body);
            }
        }
    }

    fn print_block(&mut self, body: &[Statement]) {
        if body.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.indent();
        for stmt in body {
            self.newline();
            self.print_statement(stmt);
        }
        self.dedent();
        self.newline();
        self.write("}");
    }

    fn print_variable_declaration(&mut self, decl: &VariableDeclaration) {
        self.write(decl.kind.as_str());
        self.write(" ");
        for (i, declarator) in decl.declarations.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_pattern(&declarator.pattern);
            if let Some(init) = &declarator.init {
                self.write(" = ");
                self.print_expression(init, prec::ASSIGNMENT);
            }
        }
    }

    fn print_function(&mut self, func: &Function) {
        if func.is_async {
            self.write("async ");
        }
        self.write("function");
        if func.is_generator {
            self.write("*");
        }
        if let Some(name) = &func.name {
            self.write(" ");
            self.write(&name.name);
        }
        self.print_params(&func.params);
        self.write(" ");
        match &func.body {
            FunctionBody::Block(block) => self.print_block(&block.body),
            FunctionBody::Expression(expr) => {
                // only arrows carry concise bodies; keep the output valid anyway
                self.write("{ return ");
                self.print_expression(expr, prec::SEQUENCE);
                self.write("; }");
            }
        }
    }

    fn print_params(&mut self, params: &[Pattern]) {
        self.write("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_pattern(param);
        }
        self.write(")");
    }

    fn print_arrow(&mut self, func: &Function) {
        if func.is_async {
            self.write("async ");
        }
        self.print_params(&func.params);
        self.write(" => ");
        match &func.body {
            FunctionBody::Block(block) => self.print_block(&block.body),
            FunctionBody::Expression(expr) => {
                if starts_with_object(expr) {
                    self.write("(");
                    self.print_expression(expr, prec::ASSIGNMENT);
                    self.write(")");
                } else {
                    self.print_expression(expr, prec::ASSIGNMENT);
                }
            }
        }
    }

    // ----- expressions -----

    pub fn print_expression(&mut self, expr: &Expression, min_prec: u8) {
        let needs_parens = precedence(expr) < min_prec;
        if needs_parens {
            self.write("(");
        }
        self.print_expression_inner(expr);
        if needs_parens {
            self.write(")");
        }
    }

    fn print_expression_inner(&mut self, expr: &Expression) {
        match &expr.kind {
            ExpressionKind::Identifier { name } => self.write(name),
            ExpressionKind::Literal { value } => self.print_literal(value),
            ExpressionKind::This => self.write("this"),
            ExpressionKind::Array { elements } => {
                self.write("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    match element {
                        ArrayElement::Expression(e) => self.print_expression(e, prec::ASSIGNMENT),
                        ArrayElement::Spread(e) => {
                            self.write("...");
                            self.print_expression(e, prec::ASSIGNMENT);
                        }
                        ArrayElement::Hole => {}
                    }
                }
                if matches!(elements.last(), Some(ArrayElement::Hole)) {
                    self.write(",");
                }
                self.write("]");
            }
            ExpressionKind::Object { properties } => {
                if properties.is_empty() {
                    self.write("{}");
                    return;
                }
                self.write("{ ");
                for (i, member) in properties.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    match member {
                        ObjectMember::Property {
                            key,
                            value,
                            shorthand,
                        } => {
                            let is_shorthand = *shorthand
                                && matches!(
                                    (key, value.as_identifier()),
                                    (PropertyKey::Identifier(k), Some(v)) if k == v
                                );
                            if is_shorthand {
                                self.print_expression(value, prec::ASSIGNMENT);
                            } else {
                                self.print_property_key(key);
                                self.write(": ");
                                self.print_expression(value, prec::ASSIGNMENT);
                            }
                        }
                        ObjectMember::Spread { argument } => {
                            self.write("...");
                            self.print_expression(argument, prec::ASSIGNMENT);
                        }
                    }
                }
                self.write(" }");
            }
            ExpressionKind::Function(func) => self.print_function(func),
            ExpressionKind::Arrow(func) => self.print_arrow(func),
            ExpressionKind::Unary { operator, argument } => {
                self.write(operator.as_str());
                let needs_space = match operator {
                    UnaryOp::Typeof | UnaryOp::Void | UnaryOp::Delete => true,
                    UnaryOp::Minus => starts_with_sign(argument, '-'),
                    UnaryOp::Plus => starts_with_sign(argument, '+'),
                    _ => false,
                };
                if needs_space {
                    self.write(" ");
                }
                self.print_expression(argument, prec::UNARY);
            }
            ExpressionKind::Update {
                operator,
                prefix,
                argument,
            } => {
                if *prefix {
                    self.write(operator.as_str());
                    self.print_expression(argument, prec::UNARY);
                } else {
                    self.print_expression(argument, prec::POSTFIX);
                    self.write(operator.as_str());
                }
            }
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => {
                let p = binary_precedence(*operator);
                let (left_min, right_min) = if *operator == BinaryOp::Exponent {
                    // right-associative, and a unary base must be parenthesized
                    (p + 1, p)
                } else {
                    (p, p + 1)
                };
                self.print_expression(left, left_min);
                self.write(" ");
                self.write(operator.as_str());
                self.write(" ");
                self.print_expression(right, right_min);
            }
            ExpressionKind::Logical {
                operator,
                left,
                right,
            } => {
                let p = logical_precedence(*operator);
                self.print_logical_operand(*operator, left, p);
                self.write(" ");
                self.write(operator.as_str());
                self.write(" ");
                self.print_logical_operand(*operator, right, p + 1);
            }
            ExpressionKind::Assignment {
                operator,
                left,
                right,
            } => {
                self.print_pattern(left);
                self.write(" ");
                self.write(operator.as_str());
                self.write(" ");
                self.print_expression(right, prec::ASSIGNMENT);
            }
            ExpressionKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.print_expression(test, prec::NULLISH);
                self.write(" ? ");
                self.print_expression(consequent, prec::ASSIGNMENT);
                self.write(" : ");
                self.print_expression(alternate, prec::ASSIGNMENT);
            }
            ExpressionKind::Call { callee, arguments } => {
                self.print_expression(callee, prec::CALL);
                self.print_arguments(arguments);
            }
            ExpressionKind::New { callee, arguments } => {
                self.write("new ");
                if contains_call(callee) {
                    self.write("(");
                    self.print_expression(callee, prec::SEQUENCE);
                    self.write(")");
                } else {
                    self.print_expression(callee, prec::CALL);
                }
                self.print_arguments(arguments);
            }
            ExpressionKind::Member { object, property } => {
                let numeric_object = matches!(
                    object.as_literal(),
                    Some(Literal::Number(_))
                );
                if numeric_object {
                    self.write("(");
                    self.print_expression(object, prec::SEQUENCE);
                    self.write(")");
                } else {
                    self.print_expression(object, prec::CALL);
                }
                match property {
                    MemberProperty::Static(ident) => {
                        self.write(".");
                        self.write(&ident.name);
                    }
                    MemberProperty::Computed(property) => {
                        self.write("[");
                        self.print_expression(property, prec::SEQUENCE);
                        self.write("]");
                    }
                }
            }
            ExpressionKind::Sequence { expressions } => {
                for (i, e) in expressions.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.print_expression(e, prec::ASSIGNMENT);
                }
            }
            ExpressionKind::Template { quasis, expressions } => {
                self.write("`");
                for (i, quasi) in quasis.iter().enumerate() {
                    self.write(quasi);
                    if let Some(e) = expressions.get(i) {
                        self.write("${");
                        self.print_expression(e, prec::SEQUENCE);
                        self.write("}");
                    }
                }
                self.write("`");
            }
        }
    }

    /// `??` cannot be mixed with `&&`/`||` without parentheses
    fn print_logical_operand(&mut self, parent: LogicalOp, operand: &Expression, min_prec: u8) {
        let mixes_nullish = match &operand.kind {
            ExpressionKind::Logical { operator, .. } => {
                (parent == LogicalOp::NullishCoalescing) != (*operator == LogicalOp::NullishCoalescing)
            }
            _ => false,
        };
        if mixes_nullish {
            self.write("(");
            self.print_expression(operand, prec::SEQUENCE);
            self.write(")");
        } else {
            self.print_expression(operand, min_prec);
        }
    }

    fn print_arguments(&mut self, arguments: &[crate::ast::Argument]) {
        self.write("(");
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            if argument.spread {
                self.write("...");
            }
            self.print_expression(&argument.value, prec::ASSIGNMENT);
        }
        self.write(")");
    }

    fn print_property_key(&mut self, key: &PropertyKey) {
        match key {
            PropertyKey::Identifier(name) => self.write(name),
            PropertyKey::String(value) => self.write(&quote(value)),
            PropertyKey::Number(value) => self.write(&format_number(*value)),
            PropertyKey::Computed(expr) => {
                self.write("[");
                self.print_expression(expr, prec::ASSIGNMENT);
                self.write("]");
            }
        }
    }

    fn print_literal(&mut self, value: &Literal) {
        match value {
            Literal::Null => self.write("null"),
            Literal::Boolean(true) => self.write("true"),
            Literal::Boolean(false) => self.write("false"),
            Literal::Number(n) => self.write(&format_number(*n)),
            Literal::String(s) => self.write(&quote(s)),
        }
    }

    pub fn print_pattern(&mut self, pat: &Pattern) {
        match &pat.kind {
            PatternKind::Identifier { name } => self.write(name),
            PatternKind::Object { properties, rest } => {
                if properties.is_empty() && rest.is_none() {
                    self.write("{}");
                    return;
                }
                self.write("{ ");
                for (i, property) in properties.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if property.shorthand && shorthand_matches(&property.key, &property.value) {
                        self.print_pattern(&property.value);
                    } else {
                        self.print_property_key(&property.key);
                        self.write(": ");
                        self.print_pattern(&property.value);
                    }
                }
                if let Some(rest) = rest {
                    if !properties.is_empty() {
                        self.write(", ");
                    }
                    self.write("...");
                    self.print_pattern(rest);
                }
                self.write(" }");
            }
            PatternKind::Array { elements } => {
                self.write("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(element) = element {
                        self.print_pattern(element);
                    }
                }
                if matches!(elements.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            PatternKind::Assignment { target, default } => {
                self.print_pattern(target);
                self.write(" = ");
                self.print_expression(default, prec::ASSIGNMENT);
            }
            PatternKind::Rest { argument } => {
                self.write("...");
                self.print_pattern(argument);
            }
            PatternKind::Expression { expression } => self.print_expression(expression, prec::CALL),
        }
    }
}

fn precedence(expr: &Expression) -> u8 {
    match &expr.kind {
        ExpressionKind::Sequence { .. } => prec::SEQUENCE,
        ExpressionKind::Assignment { .. } | ExpressionKind::Arrow(_) => prec::ASSIGNMENT,
        ExpressionKind::Conditional { .. } => prec::CONDITIONAL,
        ExpressionKind::Logical { operator, .. } => logical_precedence(*operator),
        ExpressionKind::Binary { operator, .. } => binary_precedence(*operator),
        ExpressionKind::Unary { .. } => prec::UNARY,
        ExpressionKind::Update { prefix: true, .. } => prec::UNARY,
        ExpressionKind::Update { prefix: false, .. } => prec::POSTFIX,
        ExpressionKind::Call { .. } | ExpressionKind::New { .. } | ExpressionKind::Member { .. } => {
            prec::CALL
        }
        ExpressionKind::Literal {
            value: Literal::Number(n),
        } if n.is_sign_negative() && !n.is_nan() => prec::UNARY,
        _ => prec::PRIMARY,
    }
}

fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::BitwiseOr => prec::BIT_OR,
        BinaryOp::BitwiseXor => prec::BIT_XOR,
        BinaryOp::BitwiseAnd => prec::BIT_AND,
        BinaryOp::Equal | BinaryOp::NotEqual | BinaryOp::StrictEqual | BinaryOp::StrictNotEqual => {
            prec::EQUALITY
        }
        BinaryOp::LessThan
        | BinaryOp::LessThanOrEqual
        | BinaryOp::GreaterThan
        | BinaryOp::GreaterThanOrEqual
        | BinaryOp::In
        | BinaryOp::Instanceof => prec::RELATIONAL,
        BinaryOp::ShiftLeft | BinaryOp::ShiftRight | BinaryOp::UnsignedShiftRight => prec::SHIFT,
        BinaryOp::Add | BinaryOp::Subtract => prec::ADDITIVE,
        BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => prec::MULTIPLICATIVE,
        BinaryOp::Exponent => prec::EXPONENT,
    }
}

fn logical_precedence(op: LogicalOp) -> u8 {
    match op {
        LogicalOp::NullishCoalescing => prec::NULLISH,
        LogicalOp::Or => prec::OR,
        LogicalOp::And => prec::AND,
    }
}

/// Leftmost token of the expression, skipping through operands that print
/// without parentheses
fn leftmost(expr: &Expression) -> &Expression {
    match &expr.kind {
        ExpressionKind::Binary { left, .. } | ExpressionKind::Logical { left, .. } => leftmost(left),
        ExpressionKind::Conditional { test, .. } => leftmost(test),
        ExpressionKind::Call { callee, .. } => leftmost(callee),
        ExpressionKind::Member { object, .. } => leftmost(object),
        ExpressionKind::Update {
            prefix: false,
            argument,
            ..
        } => leftmost(argument),
        ExpressionKind::Sequence { expressions } => match expressions.first() {
            Some(first) => leftmost(first),
            None => expr,
        },
        _ => expr,
    }
}

/// An expression statement may not begin with `{` or `function`
fn starts_ambiguously(expr: &Expression) -> bool {
    if let ExpressionKind::Assignment { left, .. } = &expr.kind {
        if matches!(left.kind, PatternKind::Object { .. }) {
            return true;
        }
    }
    matches!(
        leftmost(expr).kind,
        ExpressionKind::Object { .. } | ExpressionKind::Function(_)
    )
}

fn starts_with_object(expr: &Expression) -> bool {
    matches!(leftmost(expr).kind, ExpressionKind::Object { .. })
}

fn starts_with_sign(expr: &Expression, sign: char) -> bool {
    match &expr.kind {
        ExpressionKind::Unary { operator, .. } => {
            (sign == '-' && *operator == UnaryOp::Minus) || (sign == '+' && *operator == UnaryOp::Plus)
        }
        ExpressionKind::Update {
            operator,
            prefix: true,
            ..
        } => {
            (sign == '-' && *operator == UpdateOp::Decrement)
                || (sign == '+' && *operator == UpdateOp::Increment)
        }
        ExpressionKind::Literal {
            value: Literal::Number(n),
        } => sign == '-' && n.is_sign_negative() && !n.is_nan(),
        _ => false,
    }
}

fn contains_call(expr: &Expression) -> bool {
    match &expr.kind {
        ExpressionKind::Call { .. } => true,
        ExpressionKind::Member { object, .. } => contains_call(object),
        _ => false,
    }
}

/// Dangling-else guard: an `if` without `else` at the tail of `stmt` would
/// capture a following `else`
fn ends_with_open_if(stmt: &Statement) -> bool {
    match &stmt.kind {
        StatementKind::If(if_stmt) => match &if_stmt.alternate {
            None => true,
            Some(alternate) => ends_with_open_if(alternate),
        },
        StatementKind::While(w) => ends_with_open_if(&w.body),
        StatementKind::For(f) => ends_with_open_if(&f.body),
        StatementKind::ForIn(f) | StatementKind::ForOf(f) => ends_with_open_if(&f.body),
        StatementKind::Labeled(l) => ends_with_open_if(&l.body),
        _ => false,
    }
}

fn shorthand_matches(key: &PropertyKey, value: &Pattern) -> bool {
    let PropertyKey::Identifier(key) = key else {
        return false;
    };
    match &value.kind {
        PatternKind::Identifier { name } => name == key,
        PatternKind::Assignment { target, .. } => target.as_identifier() == Some(key.as_str()),
        _ => false,
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        format!("{}", value)
    }
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, UnaryOp, VariableKind};

    #[test]
    fn test_compact_function_and_declarations() {
        let b = AstBuilder::new();
        let program = Program::new(vec![
            b.function_decl(
                "f",
                &[],
                vec![
                    b.ret(Some(b.num(1.0))),
                    b.expr_stmt(b.console_log(vec![b.str("dead")])),
                ],
            ),
            b.var(VariableKind::Const, "x", Some(b.num(1.0))),
        ]);
        assert_eq!(
            print_compact(&program),
            r#"function f() { return 1; console.log("dead"); } const x = 1;"#
        );
    }

    #[test]
    fn test_pretty_nested_blocks() {
        let b = AstBuilder::new();
        let program = Program::new(vec![b.function_decl(
            "f",
            &["a"],
            vec![b.if_(
                b.ident("a"),
                b.block(vec![b.ret(Some(b.ident("a")))]),
                Some(b.block(vec![b.throw(b.new_expr(b.ident("Error"), vec![]))])),
            )],
        )]);
        insta::assert_snapshot!(print_program(&program).trim_end(), @r"
        function f(a) {
          if (a) {
            return a;
          } else {
            throw new Error();
          }
        }
        ");
    }

    #[test]
    fn test_precedence_parenthesization() {
        let b = AstBuilder::new();
        let sum = b.binary(BinaryOp::Add, b.ident("a"), b.ident("b"));
        let product = b.binary(BinaryOp::Multiply, sum, b.ident("c"));
        assert_eq!(expression_to_string(&product), "(a + b) * c");

        let nested = b.binary(
            BinaryOp::Subtract,
            b.ident("a"),
            b.binary(BinaryOp::Subtract, b.ident("b"), b.ident("c")),
        );
        assert_eq!(expression_to_string(&nested), "a - (b - c)");
    }

    #[test]
    fn test_statement_level_function_expression_is_wrapped() {
        let b = AstBuilder::new();
        let iife = b.expr_stmt(b.call(b.function_expr(None, &[], vec![]), vec![]));
        assert_eq!(statement_snippet(&iife), "(function() {}());");
    }

    #[test]
    fn test_arrow_with_object_body() {
        let b = AstBuilder::new();
        let arrow = b.arrow_expr(&["a"], b.object(vec![("a", b.ident("a"))]));
        assert_eq!(expression_to_string(&arrow), "(a) => ({ a: a })");
    }

    #[test]
    fn test_dangling_else_gets_braces() {
        let b = AstBuilder::new();
        let inner = b.if_(b.ident("a"), b.expr_stmt(b.call_name("f", vec![])), None);
        let outer = b.if_(b.ident("b"), inner, Some(b.expr_stmt(b.call_name("g", vec![]))));
        assert_eq!(
            statement_snippet(&outer),
            "if (b) { if (a) f(); } else g();"
        );
    }

    #[test]
    fn test_switch_compact() {
        let b = AstBuilder::new();
        let switch = b.switch(
            b.ident("x"),
            vec![
                b.case(Some(b.num(1.0)), vec![b.expr_stmt(b.call_name("a", vec![])), b.brk()]),
                b.case(None, vec![]),
            ],
        );
        assert_eq!(
            statement_snippet(&switch),
            "switch (x) { case 1: a(); break; default: }"
        );
    }

    #[test]
    fn test_string_escapes_and_numbers() {
        let b = AstBuilder::new();
        assert_eq!(expression_to_string(&b.str("a\"b\n")), r#""a\"b\n""#);
        assert_eq!(expression_to_string(&b.num(2.5)), "2.5");
        assert_eq!(expression_to_string(&b.num(f64::NAN)), "NaN");
        let neg = Expression::new(
            b.id(),
            ExpressionKind::Unary {
                operator: UnaryOp::Minus,
                argument: Box::new(b.num(-1.0)),
            },
        );
        assert_eq!(expression_to_string(&neg), "- -1");
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(print_program(&Program::new(vec![])), "");
    }
}
