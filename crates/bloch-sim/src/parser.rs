//! Minimal OPENQASM 2.0 front end.
//!
//! Accepts the subset the scheduler hands out: the version header, `include`
//! and `barrier` (ignored), register declarations, the qelib1 one- to
//! three-qubit gates, and terminal measurements. Angle parameters are
//! arithmetic over literals and `pi`. Everything else is a [`ParseError`]
//! carrying the line it was found on; the daemon reports those to the
//! scheduler as compile failures.
//!
//! Single-qubit gates and `measure` broadcast over whole registers;
//! multi-qubit gates require explicitly indexed operands.

use std::f64::consts::PI;

use thiserror::Error;

/// Errors raised while parsing circuit text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The program does not begin with the version header.
    #[error("line {line}: expected 'OPENQASM 2.0' header")]
    MissingHeader { line: usize },
    /// The program declares a version other than 2.0.
    #[error("line {line}: unsupported OPENQASM version '{version}'")]
    UnsupportedVersion { line: usize, version: String },
    /// The statement form is outside the accepted subset.
    #[error("line {line}: unsupported statement '{keyword}'")]
    UnsupportedStatement { line: usize, keyword: String },
    /// The gate name is not in the accepted set.
    #[error("line {line}: unknown gate '{name}'")]
    UnsupportedGate { line: usize, name: String },
    /// The statement could not be read at all.
    #[error("line {line}: malformed statement '{statement}'")]
    Malformed { line: usize, statement: String },
    /// A register name was declared twice.
    #[error("line {line}: register '{name}' already declared")]
    DuplicateRegister { line: usize, name: String },
    /// A register declaration exceeded the addressable index range.
    #[error("line {line}: register '{name}' exceeds the addressable index range")]
    OversizedRegister { line: usize, name: String },
    /// An operand referenced an undeclared register.
    #[error("line {line}: unknown register '{name}'")]
    UnknownRegister { line: usize, name: String },
    /// An operand index exceeded its register width.
    #[error("line {line}: index {index} is out of range for register '{name}'")]
    IndexOutOfRange {
        line: usize,
        name: String,
        index: usize,
    },
    /// A gate was applied to the wrong number of operands.
    #[error("line {line}: gate '{name}' expects {expected} operands, found {found}")]
    ArityMismatch {
        line: usize,
        name: String,
        expected: usize,
        found: usize,
    },
    /// A gate received the wrong number of angle parameters.
    #[error("line {line}: gate '{name}' expects {expected} parameters, found {found}")]
    ParameterMismatch {
        line: usize,
        name: String,
        expected: usize,
        found: usize,
    },
    /// A register-wide measurement joined registers of different widths.
    #[error("line {line}: cannot measure '{quantum}' into '{classical}': register widths differ")]
    RegisterWidthMismatch {
        line: usize,
        quantum: String,
        classical: String,
    },
    /// A multi-qubit gate named the same qubit twice.
    #[error("line {line}: gate '{name}' operands must be distinct")]
    OverlappingOperands { line: usize, name: String },
    /// An angle parameter could not be evaluated.
    #[error("line {line}: invalid angle expression '{expression}'")]
    InvalidAngle { line: usize, expression: String },
}

/// A parsed circuit, flattened to global qubit and classical bit indices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Program {
    pub(crate) qubits: usize,
    pub(crate) clbits: usize,
    pub(crate) ops: Vec<Op>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op {
    Gate(GateOp),
    Measure { qubit: usize, clbit: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GateOp {
    pub(crate) kind: GateKind,
    pub(crate) qubits: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum GateKind {
    Identity,
    PauliX,
    PauliY,
    PauliZ,
    Hadamard,
    S,
    Sdg,
    T,
    Tdg,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    Phase(f64),
    Cx,
    Cz,
    Swap,
    Ccx,
}

pub(crate) fn parse(source: &str) -> Result<Program, ParseError> {
    let statements = split_statements(source);
    let Some((header, rest)) = statements.split_first() else {
        return Err(ParseError::MissingHeader { line: 1 });
    };
    check_header(header)?;
    let mut registers = Registers::default();
    let mut ops = Vec::new();
    for statement in rest {
        parse_statement(statement, &mut registers, &mut ops)?;
    }
    Ok(Program {
        qubits: registers.quantum_width(),
        clbits: registers.classical_width(),
        ops,
    })
}

struct Statement {
    line: usize,
    text: String,
}

/// Splits the source into `;`-terminated statements, stripping `//` comments
/// and remembering the line each statement started on. A trailing statement
/// without its terminator is kept rather than dropped.
fn split_statements(source: &str) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut buffer = String::new();
    let mut start_line = 1usize;
    for (number, raw) in source.lines().enumerate() {
        let line = raw.split("//").next().unwrap_or("");
        for ch in line.chars() {
            if ch == ';' {
                flush_statement(&mut statements, &mut buffer, start_line);
            } else {
                if buffer.trim().is_empty() && !ch.is_whitespace() {
                    start_line = number + 1;
                }
                buffer.push(ch);
            }
        }
        buffer.push('\n');
    }
    flush_statement(&mut statements, &mut buffer, start_line);
    statements
}

fn flush_statement(statements: &mut Vec<Statement>, buffer: &mut String, line: usize) {
    let text = buffer.trim();
    if !text.is_empty() {
        statements.push(Statement {
            line,
            text: text.to_owned(),
        });
    }
    buffer.clear();
}

fn check_header(statement: &Statement) -> Result<(), ParseError> {
    let mut tokens = statement.text.split_whitespace();
    if tokens.next() != Some("OPENQASM") {
        return Err(ParseError::MissingHeader {
            line: statement.line,
        });
    }
    let version = tokens.next().unwrap_or_default();
    if version != "2.0" {
        return Err(ParseError::UnsupportedVersion {
            line: statement.line,
            version: version.to_owned(),
        });
    }
    Ok(())
}

fn parse_statement(
    statement: &Statement,
    registers: &mut Registers,
    ops: &mut Vec<Op>,
) -> Result<(), ParseError> {
    let keyword = leading_identifier(&statement.text);
    match keyword {
        "include" | "barrier" => Ok(()),
        "qreg" => registers.declare(statement, RegisterKind::Quantum),
        "creg" => registers.declare(statement, RegisterKind::Classical),
        "measure" => parse_measure(statement, registers, ops),
        "gate" | "opaque" | "if" | "reset" => Err(ParseError::UnsupportedStatement {
            line: statement.line,
            keyword: keyword.to_owned(),
        }),
        "" => Err(malformed(statement)),
        name => parse_gate(statement, name, registers, ops),
    }
}

fn leading_identifier(text: &str) -> &str {
    text.split(|ch: char| !ch.is_ascii_alphanumeric() && ch != '_')
        .next()
        .unwrap_or("")
}

fn malformed(statement: &Statement) -> ParseError {
    ParseError::Malformed {
        line: statement.line,
        statement: statement.text.clone(),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RegisterKind {
    Quantum,
    Classical,
}

struct Register {
    name: String,
    offset: usize,
    width: usize,
}

#[derive(Default)]
struct RegisterFile {
    entries: Vec<Register>,
    // Grown only by checked addition, so offset + width stays in range
    // for every entry.
    width: usize,
}

#[derive(Default)]
struct Registers {
    quantum: RegisterFile,
    classical: RegisterFile,
}

impl Registers {
    fn declare(&mut self, statement: &Statement, kind: RegisterKind) -> Result<(), ParseError> {
        let keyword_len = match kind {
            RegisterKind::Quantum => "qreg".len(),
            RegisterKind::Classical => "creg".len(),
        };
        let declaration = statement.text[keyword_len..].trim();
        let Some((name, Some(width))) = parse_operand(declaration) else {
            return Err(malformed(statement));
        };
        if width == 0 {
            return Err(malformed(statement));
        }
        if self.lookup(RegisterKind::Quantum, name).is_some()
            || self.lookup(RegisterKind::Classical, name).is_some()
        {
            return Err(ParseError::DuplicateRegister {
                line: statement.line,
                name: name.to_owned(),
            });
        }
        let file = match kind {
            RegisterKind::Quantum => &mut self.quantum,
            RegisterKind::Classical => &mut self.classical,
        };
        let offset = file.width;
        let Some(total) = offset.checked_add(width) else {
            return Err(ParseError::OversizedRegister {
                line: statement.line,
                name: name.to_owned(),
            });
        };
        file.entries.push(Register {
            name: name.to_owned(),
            offset,
            width,
        });
        file.width = total;
        Ok(())
    }

    fn lookup(&self, kind: RegisterKind, name: &str) -> Option<&Register> {
        let file = match kind {
            RegisterKind::Quantum => &self.quantum,
            RegisterKind::Classical => &self.classical,
        };
        file.entries.iter().find(|register| register.name == name)
    }

    fn resolve(
        &self,
        kind: RegisterKind,
        line: usize,
        name: &str,
        index: usize,
    ) -> Result<usize, ParseError> {
        let register = self
            .lookup(kind, name)
            .ok_or_else(|| ParseError::UnknownRegister {
                line,
                name: name.to_owned(),
            })?;
        if index >= register.width {
            return Err(ParseError::IndexOutOfRange {
                line,
                name: name.to_owned(),
                index,
            });
        }
        Ok(register.offset + index)
    }

    fn quantum_width(&self) -> usize {
        self.quantum.width
    }

    fn classical_width(&self) -> usize {
        self.classical.width
    }
}

/// Parses `name` or `name[index]`, with permissive whitespace.
fn parse_operand(text: &str) -> Option<(&str, Option<usize>)> {
    let text = text.trim();
    match text.find('[') {
        None => valid_identifier(text).then_some((text, None)),
        Some(open) => {
            let name = text[..open].trim_end();
            let rest = &text[open + 1..];
            let close = rest.find(']')?;
            if !rest[close + 1..].trim().is_empty() {
                return None;
            }
            let index: usize = rest[..close].trim().parse().ok()?;
            valid_identifier(name).then_some((name, Some(index)))
        }
    }
}

fn valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn parse_measure(
    statement: &Statement,
    registers: &Registers,
    ops: &mut Vec<Op>,
) -> Result<(), ParseError> {
    let line = statement.line;
    let rest = statement.text["measure".len()..].trim();
    let Some((quantum_text, classical_text)) = rest.split_once("->") else {
        return Err(malformed(statement));
    };
    let Some((quantum_name, quantum_index)) = parse_operand(quantum_text) else {
        return Err(malformed(statement));
    };
    let Some((classical_name, classical_index)) = parse_operand(classical_text) else {
        return Err(malformed(statement));
    };
    match (quantum_index, classical_index) {
        (Some(qubit), Some(clbit)) => {
            let qubit = registers.resolve(RegisterKind::Quantum, line, quantum_name, qubit)?;
            let clbit = registers.resolve(RegisterKind::Classical, line, classical_name, clbit)?;
            ops.push(Op::Measure { qubit, clbit });
            Ok(())
        }
        (None, None) => {
            let quantum = registers
                .lookup(RegisterKind::Quantum, quantum_name)
                .ok_or_else(|| ParseError::UnknownRegister {
                    line,
                    name: quantum_name.to_owned(),
                })?;
            let classical = registers
                .lookup(RegisterKind::Classical, classical_name)
                .ok_or_else(|| ParseError::UnknownRegister {
                    line,
                    name: classical_name.to_owned(),
                })?;
            if quantum.width != classical.width {
                return Err(ParseError::RegisterWidthMismatch {
                    line,
                    quantum: quantum_name.to_owned(),
                    classical: classical_name.to_owned(),
                });
            }
            for position in 0..quantum.width {
                ops.push(Op::Measure {
                    qubit: quantum.offset + position,
                    clbit: classical.offset + position,
                });
            }
            Ok(())
        }
        _ => Err(malformed(statement)),
    }
}

fn parse_gate(
    statement: &Statement,
    name: &str,
    registers: &Registers,
    ops: &mut Vec<Op>,
) -> Result<(), ParseError> {
    let line = statement.line;
    let rest = statement.text[name.len()..].trim_start();
    let (params, operand_text) = if rest.starts_with('(') {
        let close = matching_paren(rest).ok_or_else(|| malformed(statement))?;
        let params = parse_params(&rest[1..close], line)?;
        (params, rest[close + 1..].trim())
    } else {
        (Vec::new(), rest)
    };

    let expected_params = match name {
        "rx" | "ry" | "rz" | "p" | "u1" => 1,
        "id" | "x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" | "cx" | "cz" | "swap"
        | "ccx" => 0,
        _ => {
            return Err(ParseError::UnsupportedGate {
                line,
                name: name.to_owned(),
            });
        }
    };
    if params.len() != expected_params {
        return Err(ParseError::ParameterMismatch {
            line,
            name: name.to_owned(),
            expected: expected_params,
            found: params.len(),
        });
    }

    let kind = match name {
        "id" => GateKind::Identity,
        "x" => GateKind::PauliX,
        "y" => GateKind::PauliY,
        "z" => GateKind::PauliZ,
        "h" => GateKind::Hadamard,
        "s" => GateKind::S,
        "sdg" => GateKind::Sdg,
        "t" => GateKind::T,
        "tdg" => GateKind::Tdg,
        "rx" => GateKind::Rx(params[0]),
        "ry" => GateKind::Ry(params[0]),
        "rz" => GateKind::Rz(params[0]),
        "p" | "u1" => GateKind::Phase(params[0]),
        "cx" => GateKind::Cx,
        "cz" => GateKind::Cz,
        "swap" => GateKind::Swap,
        _ => GateKind::Ccx,
    };
    let arity = match kind {
        GateKind::Cx | GateKind::Cz | GateKind::Swap => 2,
        GateKind::Ccx => 3,
        _ => 1,
    };

    if operand_text.is_empty() {
        return Err(ParseError::ArityMismatch {
            line,
            name: name.to_owned(),
            expected: arity,
            found: 0,
        });
    }
    let operands = split_top_level(operand_text, ',');
    if operands.len() != arity {
        return Err(ParseError::ArityMismatch {
            line,
            name: name.to_owned(),
            expected: arity,
            found: operands.len(),
        });
    }

    if arity == 1 {
        let Some((register_name, index)) = parse_operand(operands[0]) else {
            return Err(malformed(statement));
        };
        match index {
            Some(index) => {
                let qubit = registers.resolve(RegisterKind::Quantum, line, register_name, index)?;
                ops.push(Op::Gate(GateOp {
                    kind,
                    qubits: vec![qubit],
                }));
            }
            None => {
                let register = registers
                    .lookup(RegisterKind::Quantum, register_name)
                    .ok_or_else(|| ParseError::UnknownRegister {
                        line,
                        name: register_name.to_owned(),
                    })?;
                for position in 0..register.width {
                    ops.push(Op::Gate(GateOp {
                        kind,
                        qubits: vec![register.offset + position],
                    }));
                }
            }
        }
        return Ok(());
    }

    let mut qubits = Vec::with_capacity(arity);
    for operand in &operands {
        let Some((register_name, Some(index))) = parse_operand(operand) else {
            return Err(malformed(statement));
        };
        qubits.push(registers.resolve(RegisterKind::Quantum, line, register_name, index)?);
    }
    let mut seen = qubits.clone();
    seen.sort_unstable();
    seen.dedup();
    if seen.len() != qubits.len() {
        return Err(ParseError::OverlappingOperands {
            line,
            name: name.to_owned(),
        });
    }
    ops.push(Op::Gate(GateOp { kind, qubits }));
    Ok(())
}

fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (index, ch) in text.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ch if ch == separator && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + separator.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn parse_params(inner: &str, line: usize) -> Result<Vec<f64>, ParseError> {
    split_top_level(inner, ',')
        .into_iter()
        .map(|part| {
            eval_angle(part).ok_or_else(|| ParseError::InvalidAngle {
                line,
                expression: part.trim().to_owned(),
            })
        })
        .collect()
}

/// Evaluates an angle expression over literals and `pi` with `+ - * /`,
/// unary minus, and parentheses.
fn eval_angle(expression: &str) -> Option<f64> {
    let tokens = lex_angle(expression)?;
    let mut cursor = AngleCursor {
        tokens: &tokens,
        position: 0,
    };
    let value = cursor.expr()?;
    (cursor.position == tokens.len()).then_some(value)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AngleToken {
    Number(f64),
    Pi,
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

fn lex_angle(expression: &str) -> Option<Vec<AngleToken>> {
    let chars: Vec<char> = expression.chars().collect();
    let mut tokens = Vec::new();
    let mut position = 0;
    while position < chars.len() {
        let ch = chars[position];
        match ch {
            ' ' | '\t' | '\n' => position += 1,
            '+' => {
                tokens.push(AngleToken::Plus);
                position += 1;
            }
            '-' => {
                tokens.push(AngleToken::Minus);
                position += 1;
            }
            '*' => {
                tokens.push(AngleToken::Star);
                position += 1;
            }
            '/' => {
                tokens.push(AngleToken::Slash);
                position += 1;
            }
            '(' => {
                tokens.push(AngleToken::Open);
                position += 1;
            }
            ')' => {
                tokens.push(AngleToken::Close);
                position += 1;
            }
            'p' => {
                if chars.get(position + 1) != Some(&'i') {
                    return None;
                }
                if chars
                    .get(position + 2)
                    .is_some_and(|next| next.is_ascii_alphanumeric() || *next == '_')
                {
                    return None;
                }
                tokens.push(AngleToken::Pi);
                position += 2;
            }
            '0'..='9' | '.' => {
                let start = position;
                while chars
                    .get(position)
                    .is_some_and(|next| next.is_ascii_digit() || *next == '.')
                {
                    position += 1;
                }
                if chars
                    .get(position)
                    .is_some_and(|next| *next == 'e' || *next == 'E')
                {
                    position += 1;
                    if chars
                        .get(position)
                        .is_some_and(|next| *next == '+' || *next == '-')
                    {
                        position += 1;
                    }
                    while chars.get(position).is_some_and(char::is_ascii_digit) {
                        position += 1;
                    }
                }
                let literal: String = chars[start..position].iter().collect();
                tokens.push(AngleToken::Number(literal.parse().ok()?));
            }
            _ => return None,
        }
    }
    Some(tokens)
}

struct AngleCursor<'a> {
    tokens: &'a [AngleToken],
    position: usize,
}

impl AngleCursor<'_> {
    fn peek(&self) -> Option<AngleToken> {
        self.tokens.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(AngleToken::Plus) => {
                    self.advance();
                    value += self.term()?;
                }
                Some(AngleToken::Minus) => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => return Some(value),
            }
        }
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.factor()?;
        loop {
            match self.peek() {
                Some(AngleToken::Star) => {
                    self.advance();
                    value *= self.factor()?;
                }
                Some(AngleToken::Slash) => {
                    self.advance();
                    value /= self.factor()?;
                }
                _ => return Some(value),
            }
        }
    }

    fn factor(&mut self) -> Option<f64> {
        match self.peek()? {
            AngleToken::Minus => {
                self.advance();
                Some(-self.factor()?)
            }
            AngleToken::Plus => {
                self.advance();
                self.factor()
            }
            AngleToken::Number(value) => {
                self.advance();
                Some(value)
            }
            AngleToken::Pi => {
                self.advance();
                Some(PI)
            }
            AngleToken::Open => {
                self.advance();
                let value = self.expr()?;
                if self.peek() == Some(AngleToken::Close) {
                    self.advance();
                    Some(value)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const BELL: &str = "OPENQASM 2.0;\n\
        include \"qelib1.inc\";\n\
        qreg q[2];\n\
        creg c[2];\n\
        h q[0];\n\
        cx q[0], q[1];\n\
        measure q[0] -> c[0];\n\
        measure q[1] -> c[1];\n";

    #[test]
    fn bell_circuit_parses() {
        let program = parse(BELL).expect("bell circuit should parse");
        assert_eq!(program.qubits, 2);
        assert_eq!(program.clbits, 2);
        assert_eq!(program.ops.len(), 4);
        assert_eq!(
            program.ops[0],
            Op::Gate(GateOp {
                kind: GateKind::Hadamard,
                qubits: vec![0],
            })
        );
        assert_eq!(
            program.ops[1],
            Op::Gate(GateOp {
                kind: GateKind::Cx,
                qubits: vec![0, 1],
            })
        );
        assert_eq!(program.ops[2], Op::Measure { qubit: 0, clbit: 0 });
    }

    #[test]
    fn missing_header_is_rejected() {
        let error = parse("qreg q[1];").expect_err("headerless circuit should fail");
        assert_eq!(error, ParseError::MissingHeader { line: 1 });
    }

    #[test]
    fn empty_source_is_rejected() {
        let error = parse("").expect_err("empty circuit should fail");
        assert_eq!(error, ParseError::MissingHeader { line: 1 });
    }

    #[test]
    fn other_versions_are_rejected() {
        let error = parse("OPENQASM 3.0;\n").expect_err("version 3 should fail");
        assert_eq!(
            error,
            ParseError::UnsupportedVersion {
                line: 1,
                version: "3.0".to_owned(),
            }
        );
    }

    #[test]
    fn unknown_gates_carry_their_line() {
        let source = "OPENQASM 2.0;\nqreg q[1];\nfoo q[0];\n";
        let error = parse(source).expect_err("unknown gate should fail");
        assert_eq!(
            error,
            ParseError::UnsupportedGate {
                line: 3,
                name: "foo".to_owned(),
            }
        );
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let source = "// generated\nOPENQASM 2.0;\n\nqreg q[1]; // one qubit\nx q[0];\n";
        let program = parse(source).expect("commented circuit should parse");
        assert_eq!(program.ops.len(), 1);
    }

    #[test]
    fn register_wide_gates_broadcast() {
        let source = "OPENQASM 2.0;\nqreg q[3];\nh q;\n";
        let program = parse(source).expect("broadcast should parse");
        let qubits: Vec<usize> = program
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Gate(gate) => Some(gate.qubits[0]),
                Op::Measure { .. } => None,
            })
            .collect();
        assert_eq!(qubits, vec![0, 1, 2]);
    }

    #[test]
    fn register_wide_measure_maps_pairwise() {
        let source = "OPENQASM 2.0;\nqreg q[2];\ncreg c[2];\nmeasure q -> c;\n";
        let program = parse(source).expect("register measure should parse");
        assert_eq!(
            program.ops,
            vec![
                Op::Measure { qubit: 0, clbit: 0 },
                Op::Measure { qubit: 1, clbit: 1 },
            ]
        );
    }

    #[test]
    fn mismatched_measure_widths_are_rejected() {
        let source = "OPENQASM 2.0;\nqreg q[2];\ncreg c[3];\nmeasure q -> c;\n";
        let error = parse(source).expect_err("width mismatch should fail");
        assert!(matches!(
            error,
            ParseError::RegisterWidthMismatch { line: 4, .. }
        ));
    }

    #[test]
    fn second_register_continues_the_index_space() {
        let source = "OPENQASM 2.0;\nqreg a[2];\nqreg b[2];\nx b[1];\n";
        let program = parse(source).expect("two registers should parse");
        assert_eq!(program.qubits, 4);
        assert_eq!(
            program.ops[0],
            Op::Gate(GateOp {
                kind: GateKind::PauliX,
                qubits: vec![3],
            })
        );
    }

    #[rstest]
    #[case("qreg")]
    #[case("creg")]
    fn declarations_past_the_addressable_range_are_rejected(#[case] keyword: &str) {
        let source = format!(
            "OPENQASM 2.0;\n{keyword} a[9223372036854775808];\n{keyword} b[9223372036854775808];\n"
        );
        let error = parse(&source).expect_err("overflowing declaration should fail");
        assert_eq!(
            error,
            ParseError::OversizedRegister {
                line: 3,
                name: "b".to_owned(),
            }
        );
    }

    #[test]
    fn declarations_filling_the_addressable_range_parse() {
        let source = format!("OPENQASM 2.0;\nqreg q[{}];\n", usize::MAX);
        let program = parse(&source).expect("full-range declaration should parse");
        assert_eq!(program.qubits, usize::MAX);
    }

    #[rstest]
    #[case("reset q[0];")]
    #[case("if (c == 1) x q[0];")]
    #[case("gate foo a { x a; }")]
    fn statements_outside_the_subset_are_rejected(#[case] statement: &str) {
        let source = format!("OPENQASM 2.0;\nqreg q[1];\ncreg c[1];\n{statement}\n");
        let error = parse(&source).expect_err("statement should be rejected");
        assert!(matches!(error, ParseError::UnsupportedStatement { .. }));
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let source = "OPENQASM 2.0;\nqreg q[2];\nx q[2];\n";
        let error = parse(source).expect_err("index past the width should fail");
        assert_eq!(
            error,
            ParseError::IndexOutOfRange {
                line: 3,
                name: "q".to_owned(),
                index: 2,
            }
        );
    }

    #[test]
    fn undeclared_registers_are_rejected() {
        let source = "OPENQASM 2.0;\nx q[0];\n";
        let error = parse(source).expect_err("unknown register should fail");
        assert_eq!(
            error,
            ParseError::UnknownRegister {
                line: 2,
                name: "q".to_owned(),
            }
        );
    }

    #[test]
    fn redeclared_registers_are_rejected() {
        let source = "OPENQASM 2.0;\nqreg q[1];\ncreg q[1];\n";
        let error = parse(source).expect_err("name reuse should fail");
        assert_eq!(
            error,
            ParseError::DuplicateRegister {
                line: 3,
                name: "q".to_owned(),
            }
        );
    }

    #[test]
    fn wrong_operand_counts_are_rejected() {
        let source = "OPENQASM 2.0;\nqreg q[2];\ncx q[0];\n";
        let error = parse(source).expect_err("missing target should fail");
        assert_eq!(
            error,
            ParseError::ArityMismatch {
                line: 3,
                name: "cx".to_owned(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn missing_angle_parameters_are_rejected() {
        let source = "OPENQASM 2.0;\nqreg q[1];\nrx q[0];\n";
        let error = parse(source).expect_err("missing angle should fail");
        assert_eq!(
            error,
            ParseError::ParameterMismatch {
                line: 3,
                name: "rx".to_owned(),
                expected: 1,
                found: 0,
            }
        );
    }

    #[test]
    fn repeated_operands_are_rejected() {
        let source = "OPENQASM 2.0;\nqreg q[2];\ncx q[1], q[1];\n";
        let error = parse(source).expect_err("overlapping operands should fail");
        assert!(matches!(error, ParseError::OverlappingOperands { .. }));
    }

    #[rstest]
    #[case("pi", PI)]
    #[case("pi/2", PI / 2.0)]
    #[case("-pi/4", -PI / 4.0)]
    #[case("2*pi", 2.0 * PI)]
    #[case("(pi + pi)/4", PI / 2.0)]
    #[case("0.5", 0.5)]
    #[case("1e-3", 0.001)]
    #[case("3 - 2 - 1", 0.0)]
    fn angle_expressions_evaluate(#[case] expression: &str, #[case] expected: f64) {
        let source = format!("OPENQASM 2.0;\nqreg q[1];\nrz({expression}) q[0];\n");
        let program = parse(&source).expect("angle should evaluate");
        let Op::Gate(gate) = &program.ops[0] else {
            panic!("expected a gate op");
        };
        let GateKind::Rz(angle) = gate.kind else {
            panic!("expected an rz gate");
        };
        assert!((angle - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case("pj")]
    #[case("pi pi")]
    #[case("(pi")]
    #[case("1..2")]
    #[case("")]
    fn invalid_angles_are_rejected(#[case] expression: &str) {
        let source = format!("OPENQASM 2.0;\nqreg q[1];\nrz({expression}) q[0];\n");
        let error = parse(&source).expect_err("angle should be rejected");
        assert!(matches!(error, ParseError::InvalidAngle { line: 3, .. }));
    }

    #[test]
    fn trailing_statement_without_terminator_is_kept() {
        let source = "OPENQASM 2.0;\nqreg q[1];\nx q[0]";
        let program = parse(source).expect("unterminated trailing statement should parse");
        assert_eq!(program.ops.len(), 1);
    }
}
