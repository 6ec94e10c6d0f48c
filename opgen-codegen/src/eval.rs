//! A small evaluator for generated fragments.
//!
//! Executes the integer subset of the fragment language against named byte
//! buffers, which is enough to run opcode reads, writes, and dispatch
//! switches produced by this crate. All values are `i64`; booleans are `0`
//! and `1`.

use std::collections::HashMap;

use opgen_ir::{BinOp, CaseLabel, Expr, Stmt, SwitchArm, Type};
use thiserror::Error;

use crate::opcode_io::{GET_SHORT, LE_BYTES, PUT_SHORT};

/// Errors from [`Machine`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("unbound variable '{0}'")]
    Unbound(String),
    #[error("unknown buffer '{0}'")]
    UnknownBuffer(String),
    #[error("{width}-byte access at offset {offset} out of bounds (buffer length: {len})")]
    OutOfBounds { offset: i64, width: usize, len: usize },
    #[error("division by zero")]
    DivisionByZero,
    #[error("unsupported fragment: {0}")]
    Unsupported(String),
}

/// How control leaves a statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Normal,
    Break,
    Return(Option<i64>),
}

/// Variables and byte buffers of one evaluation.
#[derive(Debug, Clone, Default)]
pub struct Machine {
    vars: HashMap<String, i64>,
    buffers: HashMap<String, Vec<u8>>,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buffer(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.buffers.insert(name.into(), bytes);
        self
    }

    pub fn with_var(mut self, name: impl Into<String>, value: i64) -> Self {
        self.vars.insert(name.into(), value);
        self
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: i64) {
        self.vars.insert(name.into(), value);
    }

    pub fn var(&self, name: &str) -> Option<i64> {
        self.vars.get(name).copied()
    }

    pub fn buffer(&self, name: &str) -> Option<&[u8]> {
        self.buffers.get(name).map(Vec::as_slice)
    }

    /// Execute statements in order until one leaves abnormally.
    pub fn exec_block(&mut self, stmts: &[Stmt]) -> Result<Flow, EvalError> {
        for stmt in stmts {
            let flow = self.exec(stmt)?;
            if flow != Flow::Normal {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    pub fn exec(&mut self, stmt: &Stmt) -> Result<Flow, EvalError> {
        match stmt {
            Stmt::Expr(e) => {
                self.eval(e)?;
                Ok(Flow::Normal)
            }
            Stmt::Constant { name, init, .. } => {
                let value = self.eval(init)?;
                self.vars.insert(name.clone(), value);
                Ok(Flow::Normal)
            }
            Stmt::Assign { target, value } => {
                let value = self.eval(value)?;
                self.store(target, value)?;
                Ok(Flow::Normal)
            }
            Stmt::Return(e) => {
                let value = e.as_ref().map(|e| self.eval(e)).transpose()?;
                Ok(Flow::Return(value))
            }
            Stmt::Switch { discriminant, arms } => self.exec_switch(discriminant, arms),
            Stmt::Break => Ok(Flow::Break),
            Stmt::Block(body) => self.exec_block(body),
            Stmt::Raw(text) => Err(EvalError::Unsupported(text.clone())),
        }
    }

    /// Jump to the first arm with a matching label (or the default arm) and
    /// run arm bodies from there until one breaks.
    fn exec_switch(&mut self, discriminant: &Expr, arms: &[SwitchArm]) -> Result<Flow, EvalError> {
        let value = self.eval(discriminant)?;

        let mut entry = None;
        'arms: for (idx, arm) in arms.iter().enumerate() {
            for label in &arm.labels {
                if let CaseLabel::Value(e) = label {
                    if self.eval(e)? == value {
                        entry = Some(idx);
                        break 'arms;
                    }
                }
            }
        }
        let entry = entry.or_else(|| arms.iter().position(SwitchArm::is_default));
        let Some(entry) = entry else {
            return Ok(Flow::Normal);
        };

        for arm in &arms[entry..] {
            match self.exec_block(&arm.body)? {
                Flow::Normal => {}
                Flow::Break => return Ok(Flow::Normal),
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal)
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<i64, EvalError> {
        match expr {
            Expr::IntLit(n) => Ok(*n),
            Expr::Var(name) => self
                .vars
                .get(name)
                .copied()
                .ok_or_else(|| EvalError::Unbound(name.clone())),
            Expr::Raw(text) => self.eval_raw(text),
            Expr::BinaryOp { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs),
            Expr::Cast { ty, expr } => {
                let v = self.eval(expr)?;
                match ty {
                    Type::Byte => Ok(i64::from(v as i8)),
                    Type::Short => Ok(i64::from(v as i16)),
                    Type::Char => Ok(i64::from(v as u16)),
                    Type::Int => Ok(i64::from(v as i32)),
                    Type::Long => Ok(v),
                    other => Err(EvalError::Unsupported(format!("cast to {other}"))),
                }
            }
            Expr::Call {
                receiver: Some(recv),
                method,
                args,
            } if **recv == Expr::var(LE_BYTES) => self.eval_le_bytes(method, args),
            other => Err(EvalError::Unsupported(format!("{other:?}"))),
        }
    }

    fn store(&mut self, target: &Expr, value: i64) -> Result<(), EvalError> {
        match target {
            Expr::Var(name) => {
                self.vars.insert(name.clone(), value);
                Ok(())
            }
            other => Err(EvalError::Unsupported(format!("assignment to {other:?}"))),
        }
    }

    /// Raw text is limited to integer literals, variable names, and sums of
    /// those.
    fn eval_raw(&mut self, text: &str) -> Result<i64, EvalError> {
        text.split('+').try_fold(0i64, |acc, term| {
            let term = term.trim();
            let value = if let Ok(n) = term.parse::<i64>() {
                n
            } else if !term.is_empty()
                && term
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
            {
                self.eval(&Expr::var(term))?
            } else {
                return Err(EvalError::Unsupported(text.to_string()));
            };
            Ok(acc.wrapping_add(value))
        })
    }

    fn eval_binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr) -> Result<i64, EvalError> {
        let l = self.eval(lhs)?;
        match op {
            BinOp::And if l == 0 => return Ok(0),
            BinOp::Or if l != 0 => return Ok(1),
            _ => {}
        }
        let r = self.eval(rhs)?;
        Ok(match op {
            BinOp::Add => l.wrapping_add(r),
            BinOp::Sub => l.wrapping_sub(r),
            BinOp::Mul => l.wrapping_mul(r),
            BinOp::Div if r == 0 => return Err(EvalError::DivisionByZero),
            BinOp::Div => l.wrapping_div(r),
            BinOp::Rem if r == 0 => return Err(EvalError::DivisionByZero),
            BinOp::Rem => l.wrapping_rem(r),
            BinOp::Eq => i64::from(l == r),
            BinOp::NotEq => i64::from(l != r),
            BinOp::Lt => i64::from(l < r),
            BinOp::Gt => i64::from(l > r),
            BinOp::Le => i64::from(l <= r),
            BinOp::Ge => i64::from(l >= r),
            BinOp::And | BinOp::Or => i64::from(r != 0),
            BinOp::BitAnd => l & r,
            BinOp::BitOr => l | r,
            BinOp::BitXor => l ^ r,
            BinOp::Shl => l.wrapping_shl(r as u32),
            BinOp::Shr => l.wrapping_shr(r as u32),
            BinOp::UShr => ((l as u64).wrapping_shr(r as u32)) as i64,
        })
    }

    fn eval_le_bytes(&mut self, method: &str, args: &[Expr]) -> Result<i64, EvalError> {
        match (method, args) {
            (GET_SHORT, [Expr::Var(buf), offset]) => {
                let offset = self.eval(offset)?;
                let bytes = self.slot(buf, offset)?;
                let [lo, hi] = [bytes[0], bytes[1]];
                Ok(i64::from(i16::from_le_bytes([lo, hi])))
            }
            (PUT_SHORT, [Expr::Var(buf), offset, value]) => {
                let offset = self.eval(offset)?;
                let value = self.eval(value)?;
                let bytes = self.slot(buf, offset)?;
                bytes.copy_from_slice(&(value as u16).to_le_bytes());
                Ok(0)
            }
            _ => Err(EvalError::Unsupported(format!("{LE_BYTES}.{method}"))),
        }
    }

    fn slot(&mut self, buf: &str, offset: i64) -> Result<&mut [u8], EvalError> {
        let bytes = self
            .buffers
            .get_mut(buf)
            .ok_or_else(|| EvalError::UnknownBuffer(buf.to_string()))?;
        let len = bytes.len();
        let start = usize::try_from(offset)
            .ok()
            .filter(|&start| start.checked_add(2).is_some_and(|end| end <= len))
            .ok_or(EvalError::OutOfBounds {
                offset,
                width: 2,
                len,
            })?;
        Ok(&mut bytes[start..start + 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_sums() {
        let mut m = Machine::new().with_var("$bci", 10);
        assert_eq!(m.eval(&Expr::raw("$bci + 2")).unwrap(), 12);
        assert_eq!(m.eval(&Expr::raw("7")).unwrap(), 7);
        assert!(matches!(
            m.eval(&Expr::raw("a * 2")),
            Err(EvalError::Unsupported(_))
        ));
    }

    #[test]
    fn unbound_variable() {
        let mut m = Machine::new();
        assert_eq!(
            m.eval(&Expr::var("x")),
            Err(EvalError::Unbound("x".into()))
        );
    }

    #[test]
    fn narrowing_casts() {
        let mut m = Machine::new();
        assert_eq!(m.eval(&Expr::cast(Type::Short, Expr::int(0x1_8000))).unwrap(), -0x8000);
        assert_eq!(m.eval(&Expr::cast(Type::Byte, Expr::int(0x1ff))).unwrap(), -1);
        assert_eq!(m.eval(&Expr::cast(Type::Char, Expr::int(-1))).unwrap(), 0xffff);
    }

    #[test]
    fn division_by_zero() {
        let mut m = Machine::new();
        let e = Expr::binary(BinOp::Div, Expr::int(1), Expr::int(0));
        assert_eq!(m.eval(&e), Err(EvalError::DivisionByZero));
    }
}
