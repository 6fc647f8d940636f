//! Module `interpreter` implements the tree-walking evaluator.
//!
//! `Interpreter` owns the scope arena and an injectable print sink, and
//! dispatches over [`Stmt`]/[`Expr`] with total matches.  Every evaluation
//! step yields a [`Flow`]: loop constructs intercept `Break`/`Continue`,
//! call boundaries intercept `Return`, and everything else forwards
//! signals upward untouched.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info};
use rand::Rng;

use crate::ast::{Expr, Program, Property, Stmt, TypeAnnotation};
use crate::environment::{Environment, ScopeId};
use crate::error::{QuillError, Result};
use crate::value::{Flow, Function, NativeFn, Value};

/// Unwrap a normal value out of a `Flow`, forwarding any control-flow
/// signal to the caller unchanged.
macro_rules! eval_value {
    ($flow:expr) => {
        match $flow? {
            Flow::Value(value) => value,
            signal => return Ok(signal),
        }
    };
}

pub struct Interpreter {
    env: Environment,
    root: ScopeId,
    sink: Rc<dyn Fn(&str)>,
}

impl Interpreter {
    /// Interpreter printing to stdout.
    pub fn new() -> Self {
        Self::with_sink(Rc::new(|line: &str| println!("{line}")))
    }

    /// Interpreter routing `print` output through `sink`.  Tests inject a
    /// capturing sink here.
    pub fn with_sink(sink: Rc<dyn Fn(&str)>) -> Self {
        let env = Environment::new();
        let root = env.root();

        let mut interpreter = Self { env, root, sink };
        interpreter.install_builtins();

        interpreter
    }

    /// Declare a host-provided native in the root scope (constant).
    pub fn register_native<S: Into<String>>(&mut self, name: S, func: NativeFn) -> Result<Value> {
        let name = name.into();
        let native = Value::NativeFunction {
            name: name.clone(),
            func,
        };

        self.env.declare(self.root, &name, native, true, true)
    }

    /// Evaluate a whole program in the root scope and return the value of
    /// its last statement (`null` for an empty program).
    pub fn run(&mut self, program: &Program) -> Result<Value> {
        info!("Evaluating program with {} statements", program.body.len());

        let mut last = Value::Null;

        for stmt in &program.body {
            match self.eval_stmt(stmt, self.root)? {
                Flow::Value(value) => last = value,
                // The parser rejects break/continue/return outside their
                // constructs, so a signal here is an evaluator fault.
                signal => {
                    return Err(QuillError::internal(format!(
                        "control-flow signal {signal:?} escaped the program root"
                    )))
                }
            }
        }

        Ok(last)
    }

    // ───────────────────────── statements ───────────────────────────────

    fn eval_stmt(&mut self, stmt: &Stmt, scope: ScopeId) -> Result<Flow> {
        match stmt {
            Stmt::VarDeclaration {
                constant,
                annotation,
                identifier,
                value,
            } => self.eval_var_declaration(*constant, *annotation, identifier, value, scope),

            Stmt::FunctionDeclaration {
                name,
                parameters,
                body,
            } => {
                let function = Value::Function(Rc::new(Function {
                    name: name.clone(),
                    parameters: parameters.clone(),
                    body: body.clone(),
                    declaration_scope: scope,
                }));

                let declared = self.env.declare(scope, name, function, false, true)?;

                Ok(Flow::Value(declared))
            }

            Stmt::If {
                condition,
                body,
                else_body,
            } => self.eval_if(condition, body, else_body, scope),

            Stmt::For {
                init,
                condition,
                iteration,
                body,
            } => self.eval_for(init, condition, iteration, body, scope),

            Stmt::While { condition, body } => self.eval_while(condition, body, scope),

            Stmt::Expr(expr) => self.eval_expr(expr, scope),
        }
    }

    fn eval_var_declaration(
        &mut self,
        constant: bool,
        annotation: Option<TypeAnnotation>,
        identifier: &str,
        value: &Option<Expr>,
        scope: ScopeId,
    ) -> Result<Flow> {
        let value = match value {
            Some(expr) => eval_value!(self.eval_expr(expr, scope)),
            None => Value::Unassigned,
        };

        let untyped = match annotation {
            None | Some(TypeAnnotation::Any) => true,
            Some(expected) => {
                let expected_tag = match expected {
                    TypeAnnotation::Int | TypeAnnotation::Float => "number",
                    TypeAnnotation::Str => "string",
                    TypeAnnotation::Bool => "boolean",
                    TypeAnnotation::Obj => "object",
                    TypeAnnotation::Any => unreachable!(),
                };

                if !matches!(value, Value::Unassigned) && value.tag() != expected_tag {
                    return Err(QuillError::runtime(format!(
                        "Cannot initialise '{identifier}' ({expected_tag}) with a {} value",
                        value.tag()
                    )));
                }

                false
            }
        };

        debug!("Declaring '{identifier}' (constant: {constant})");

        let declared = self.env.declare(scope, identifier, value, constant, untyped)?;

        Ok(Flow::Value(declared))
    }

    fn eval_if(
        &mut self,
        condition: &Expr,
        body: &[Stmt],
        else_body: &[Stmt],
        scope: ScopeId,
    ) -> Result<Flow> {
        let condition = eval_value!(self.eval_expr(condition, scope));

        let Value::Bool(truthy) = condition else {
            return Err(QuillError::runtime(format!(
                "Invalid condition for if statement: expected a boolean, found {}",
                condition.tag()
            )));
        };

        let branch_scope = self.env.push_scope(scope);
        let branch = if truthy { body } else { else_body };

        let mut result = Value::Null;

        for stmt in branch {
            match self.eval_stmt(stmt, branch_scope)? {
                Flow::Value(value) => result = value,
                signal => return Ok(signal),
            }
        }

        Ok(Flow::Value(result))
    }

    fn eval_while(&mut self, condition: &Expr, body: &[Stmt], scope: ScopeId) -> Result<Flow> {
        let loop_scope = self.env.push_scope(scope);

        'iterations: loop {
            let test = eval_value!(self.eval_expr(condition, loop_scope));

            if test != Value::Bool(true) {
                break;
            }

            for stmt in body {
                match self.eval_stmt(stmt, loop_scope)? {
                    Flow::Value(_) => {}
                    Flow::Break => break 'iterations,
                    Flow::Continue => continue 'iterations,
                    Flow::Return(value) => return Ok(Flow::Return(value)),
                }
            }
        }

        Ok(Flow::Value(Value::Null))
    }

    fn eval_for(
        &mut self,
        init: &Stmt,
        condition: &Expr,
        iteration: &Expr,
        body: &[Stmt],
        scope: ScopeId,
    ) -> Result<Flow> {
        let loop_scope = self.env.push_scope(scope);

        // The induction variable lives in the loop scope.
        eval_value!(self.eval_stmt(init, loop_scope));

        'iterations: loop {
            let test = eval_value!(self.eval_expr(condition, loop_scope));

            if test != Value::Bool(true) {
                break;
            }

            'body: for stmt in body {
                match self.eval_stmt(stmt, loop_scope)? {
                    Flow::Value(_) => {}
                    Flow::Break => break 'iterations,
                    // The iteration clause still runs after a continue.
                    Flow::Continue => break 'body,
                    Flow::Return(value) => return Ok(Flow::Return(value)),
                }
            }

            eval_value!(self.eval_expr(iteration, loop_scope));
        }

        Ok(Flow::Value(Value::Null))
    }

    // ───────────────────────── expressions ──────────────────────────────

    fn eval_expr(&mut self, expr: &Expr, scope: ScopeId) -> Result<Flow> {
        match expr {
            Expr::NumericLiteral(n) => Ok(Flow::Value(Value::Number(*n))),

            // Each evaluation of a string literal allocates fresh backing
            // storage; literals are never aliased.
            Expr::StringLiteral(text) => Ok(Flow::Value(Value::string(text.clone()))),

            Expr::BoolLiteral(b) => Ok(Flow::Value(Value::Bool(*b))),

            Expr::Null => Ok(Flow::Value(Value::Null)),

            Expr::Unassigned => Ok(Flow::Value(Value::Unassigned)),

            Expr::Identifier(name) => Ok(Flow::Value(self.env.lookup(scope, name)?)),

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let lhs = eval_value!(self.eval_expr(left, scope));
                let rhs = eval_value!(self.eval_expr(right, scope));

                Ok(Flow::Value(eval_binary(&lhs, operator, &rhs)?))
            }

            Expr::Unary { operator, right } => {
                let operand = eval_value!(self.eval_expr(right, scope));

                let Value::Number(n) = operand else {
                    return Err(QuillError::runtime(format!(
                        "Cannot use unary '{operator}' on a {} value",
                        operand.tag()
                    )));
                };

                let result = if operator == "-" { -n } else { n };

                Ok(Flow::Value(Value::Number(result)))
            }

            Expr::Assignment { assignee, value } => self.eval_assignment(assignee, value, scope),

            Expr::Call { caller, args } => self.eval_call(caller, args, scope),

            Expr::Member {
                object,
                property,
                computed,
            } => self.eval_member(object, property, *computed, scope, None),

            Expr::ObjectLiteral(properties) => self.eval_object_literal(properties, scope),

            Expr::ArrayLiteral(elements) => {
                let mut values = Vec::with_capacity(elements.len());

                for element in elements {
                    values.push(eval_value!(self.eval_expr(element, scope)));
                }

                Ok(Flow::Value(Value::array(values)))
            }

            Expr::Break => Ok(Flow::Break),

            Expr::Continue => Ok(Flow::Continue),

            Expr::Return(inner) => {
                let value = eval_value!(self.eval_expr(inner, scope));

                Ok(Flow::Return(value))
            }
        }
    }

    fn eval_assignment(&mut self, assignee: &Expr, value: &Expr, scope: ScopeId) -> Result<Flow> {
        match assignee {
            Expr::Identifier(name) => {
                let value = eval_value!(self.eval_expr(value, scope));

                Ok(Flow::Value(self.env.assign(scope, name, value)?))
            }

            Expr::Member {
                object,
                property,
                computed,
            } => {
                let value = eval_value!(self.eval_expr(value, scope));

                self.eval_member(object, property, *computed, scope, Some(value))
            }

            other => Err(QuillError::runtime(format!(
                "Invalid assignment target: {other:?}"
            ))),
        }
    }

    fn eval_object_literal(&mut self, properties: &[Property], scope: ScopeId) -> Result<Flow> {
        let mut map = HashMap::with_capacity(properties.len());

        for property in properties {
            let value = match &property.value {
                // Shorthand `{ key }` reads the variable of the same name.
                None => self.env.lookup(scope, &property.key)?,
                Some(stmt) => eval_value!(self.eval_stmt(stmt, scope)),
            };

            map.insert(property.key.clone(), value);
        }

        Ok(Flow::Value(Value::object(map)))
    }

    fn eval_call(&mut self, caller: &Expr, args: &[Expr], scope: ScopeId) -> Result<Flow> {
        let callee = eval_value!(self.eval_expr(caller, scope));

        let mut arg_values = Vec::with_capacity(args.len());

        for arg in args {
            arg_values.push(eval_value!(self.eval_expr(arg, scope)));
        }

        match callee {
            Value::NativeFunction { name, func } => {
                debug!("Calling native '{name}' with {} args", arg_values.len());

                Ok(Flow::Value(func(&arg_values)?))
            }

            Value::Function(function) => self.invoke_function(&function, &arg_values),

            other => Err(QuillError::runtime(format!(
                "Cannot call a value of type {}",
                other.tag()
            ))),
        }
    }

    fn invoke_function(&mut self, function: &Rc<Function>, args: &[Value]) -> Result<Flow> {
        debug!(
            "Calling function '{}' with {} args",
            function.name,
            args.len()
        );

        let call_scope = self.env.push_scope(function.declaration_scope);

        for (i, parameter) in function.parameters.iter().enumerate() {
            let argument = args.get(i).cloned().unwrap_or(Value::Unassigned);

            self.env.declare(call_scope, parameter, argument, false, true)?;
        }

        let mut last = Value::Null;

        for stmt in &function.body {
            match self.eval_stmt(stmt, call_scope)? {
                Flow::Value(value) => last = value,
                Flow::Return(value) => return Ok(Flow::Value(value)),
                // A loop signal reaching the call boundary has nothing to
                // unwind; the call degrades to null.
                Flow::Break | Flow::Continue => return Ok(Flow::Value(Value::Null)),
            }
        }

        Ok(Flow::Value(last))
    }

    fn eval_member(
        &mut self,
        object: &Expr,
        property: &Expr,
        computed: bool,
        scope: ScopeId,
        mutate: Option<Value>,
    ) -> Result<Flow> {
        let target = eval_value!(self.eval_expr(object, scope));

        if computed {
            let key = eval_value!(self.eval_expr(property, scope));

            return Ok(Flow::Value(computed_access(&target, &key, mutate)?));
        }

        let Expr::Identifier(name) = property else {
            return Err(QuillError::internal(
                "non-computed member access with a non-identifier property",
            ));
        };

        match &target {
            Value::Object(map) => {
                if let Some(value) = mutate {
                    map.borrow_mut().insert(name.clone(), value.clone());

                    return Ok(Flow::Value(value));
                }

                match map.borrow().get(name) {
                    Some(value) => Ok(Flow::Value(value.clone())),
                    None => Err(QuillError::runtime(format!(
                        "Property '{name}' does not exist on object"
                    ))),
                }
            }

            Value::Array(elements) => array_method(elements, name).map(Flow::Value),

            Value::Str(text) => string_method(text, name).map(Flow::Value),

            other => Err(QuillError::runtime(format!(
                "Expected an object, array, or string, found {}",
                other.tag()
            ))),
        }
    }

    // ───────────────────────── builtins ─────────────────────────────────

    /// Root-scope built-ins: `print`, `len`, and the `Math` object.  All
    /// declared constant.
    fn install_builtins(&mut self) {
        let sink = Rc::clone(&self.sink);

        let print = Value::native("print", move |args: &[Value]| {
            let line = args
                .iter()
                .map(|value| value.to_string())
                .collect::<Vec<_>>()
                .join(" ");

            sink(&line);

            Ok(Value::Null)
        });

        let len = Value::native("len", |args: &[Value]| {
            let [target] = args else {
                return Err(QuillError::runtime(format!(
                    "len expects exactly 1 argument, found {}",
                    args.len()
                )));
            };

            match target {
                Value::Array(elements) => Ok(Value::Number(elements.borrow().len() as f64)),
                Value::Str(text) => Ok(Value::Number(text.borrow().chars().count() as f64)),
                other => Err(QuillError::runtime(format!(
                    "len expects an array or string, found {}",
                    other.tag()
                ))),
            }
        });

        // Builtin declaration cannot collide in a fresh root frame.
        let result = self
            .env
            .declare(self.root, "print", print, true, true)
            .and_then(|_| self.env.declare(self.root, "len", len, true, true))
            .and_then(|_| {
                let math = math_object();
                self.env.declare(self.root, "Math", math, true, true)
            });

        debug_assert!(result.is_ok());
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────── operator tables ──────────────────────────────

fn eval_binary(lhs: &Value, operator: &str, rhs: &Value) -> Result<Value> {
    match operator {
        // Both sides were already evaluated: && and || never short-circuit.
        "&&" | "||" => {
            let (Value::Bool(a), Value::Bool(b)) = (lhs, rhs) else {
                return Err(invalid_operands(lhs, operator, rhs));
            };

            let result = if operator == "&&" { *a && *b } else { *a || *b };

            Ok(Value::Bool(result))
        }

        "==" => Ok(Value::Bool(lhs == rhs)),

        "!=" => Ok(Value::Bool(lhs != rhs)),

        "<" | ">" | "<=" | ">=" => {
            let (Value::Number(a), Value::Number(b)) = (lhs, rhs) else {
                return Err(invalid_operands(lhs, operator, rhs));
            };

            let result = match operator {
                "<" => a < b,
                ">" => a > b,
                "<=" => a <= b,
                _ => a >= b,
            };

            Ok(Value::Bool(result))
        }

        _ => {
            let (Value::Number(a), Value::Number(b)) = (lhs, rhs) else {
                return Err(invalid_operands(lhs, operator, rhs));
            };

            let result = match operator {
                "+" => a + b,
                "-" => a - b,
                "*" => a * b,
                "/" => a / b,
                "%" => a % b,
                "^" => a.powf(*b),
                "//" => (a / b).floor(),
                _ => {
                    return Err(QuillError::internal(format!(
                        "unknown binary operator '{operator}'"
                    )))
                }
            };

            Ok(Value::Number(result))
        }
    }
}

fn invalid_operands(lhs: &Value, operator: &str, rhs: &Value) -> QuillError {
    QuillError::runtime(format!(
        "Invalid binary expression: cannot use '{operator}' on {} and {}",
        lhs.tag(),
        rhs.tag()
    ))
}

// ───────────────────────── member access ────────────────────────────────

/// `target[key]`, optionally writing `mutate` through the path first.
fn computed_access(target: &Value, key: &Value, mutate: Option<Value>) -> Result<Value> {
    match target {
        Value::Object(map) => {
            let Value::Str(key) = key else {
                return Err(QuillError::runtime(format!(
                    "Object keys must be strings, found {}",
                    key.tag()
                )));
            };

            let key = key.borrow().clone();

            if let Some(value) = mutate {
                map.borrow_mut().insert(key, value.clone());

                return Ok(value);
            }

            // A missing key reads as the unassigned sentinel.
            Ok(map
                .borrow()
                .get(&key)
                .cloned()
                .unwrap_or(Value::Unassigned))
        }

        Value::Array(elements) => {
            let index = array_index(key, elements.borrow().len())?;

            if let Some(value) = mutate {
                elements.borrow_mut()[index] = value.clone();

                return Ok(value);
            }

            Ok(elements.borrow()[index].clone())
        }

        Value::Str(text) => {
            let text = text.borrow();
            let index = array_index(key, text.chars().count())?;

            // Unwrap is fine: the index was bounds-checked against the
            // character count.
            let ch = text.chars().nth(index).unwrap();

            Ok(Value::string(ch))
        }

        other => Err(QuillError::runtime(format!(
            "Cannot index into a {} value",
            other.tag()
        ))),
    }
}

/// Validate a computed index against `len`: numeric, integral, in
/// `[0, len)`.
fn array_index(key: &Value, len: usize) -> Result<usize> {
    let Value::Number(n) = key else {
        return Err(QuillError::runtime(format!(
            "Index must be a number, found {}",
            key.tag()
        )));
    };

    if n.fract() != 0.0 || *n < 0.0 || *n >= len as f64 {
        return Err(QuillError::runtime(format!(
            "Index {n} is out of bounds for length {len}"
        )));
    }

    Ok(*n as usize)
}

/// Array methods are natives closing over the array's backing storage, so
/// mutation is visible through every alias of the same array.
fn array_method(elements: &Rc<std::cell::RefCell<Vec<Value>>>, name: &str) -> Result<Value> {
    match name {
        "push" => {
            let backing = Rc::clone(elements);

            Ok(Value::native("push", move |args: &[Value]| {
                backing.borrow_mut().extend(args.iter().cloned());

                Ok(Value::Array(Rc::clone(&backing)))
            }))
        }

        "pop" => {
            let backing = Rc::clone(elements);

            Ok(Value::native("pop", move |_args: &[Value]| {
                Ok(backing.borrow_mut().pop().unwrap_or(Value::Unassigned))
            }))
        }

        "shift" => {
            let backing = Rc::clone(elements);

            Ok(Value::native("shift", move |_args: &[Value]| {
                let mut elements = backing.borrow_mut();

                if elements.is_empty() {
                    Ok(Value::Unassigned)
                } else {
                    Ok(elements.remove(0))
                }
            }))
        }

        other => Err(QuillError::runtime(format!(
            "Method '{other}' does not exist on arrays"
        ))),
    }
}

/// String methods mutate the shared backing text in place.
fn string_method(text: &Rc<std::cell::RefCell<String>>, name: &str) -> Result<Value> {
    match name {
        "concat" => {
            let backing = Rc::clone(text);

            Ok(Value::native("concat", move |args: &[Value]| {
                for arg in args {
                    let Value::Str(suffix) = arg else {
                        return Err(QuillError::runtime(format!(
                            "concat expects string arguments, found {}",
                            arg.tag()
                        )));
                    };

                    let suffix = suffix.borrow().clone();
                    backing.borrow_mut().push_str(&suffix);
                }

                Ok(Value::Str(Rc::clone(&backing)))
            }))
        }

        other => Err(QuillError::runtime(format!(
            "Method '{other}' does not exist on strings"
        ))),
    }
}

// ───────────────────────── Math builtin ─────────────────────────────────

fn expect_number(value: &Value, context: &str) -> Result<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(QuillError::runtime(format!(
            "{context} expects a number, found {}",
            other.tag()
        ))),
    }
}

fn unary_math<F>(name: &'static str, op: F) -> Value
where
    F: Fn(f64) -> f64 + 'static,
{
    Value::native(name, move |args: &[Value]| {
        let [value] = args else {
            return Err(QuillError::runtime(format!(
                "Math.{name} expects exactly 1 argument, found {}",
                args.len()
            )));
        };

        Ok(Value::Number(op(expect_number(value, name)?)))
    })
}

fn spread_math<F>(name: &'static str, op: F) -> Value
where
    F: Fn(f64, f64) -> f64 + 'static,
{
    Value::native(name, move |args: &[Value]| {
        let (first, rest) = args.split_first().ok_or_else(|| {
            QuillError::runtime(format!("Math.{name} expects at least 1 argument"))
        })?;

        let mut best = expect_number(first, name)?;

        for value in rest {
            best = op(best, expect_number(value, name)?);
        }

        Ok(Value::Number(best))
    })
}

fn math_object() -> Value {
    let mut math = HashMap::new();

    math.insert("abs".to_string(), unary_math("abs", f64::abs));
    math.insert("floor".to_string(), unary_math("floor", f64::floor));
    math.insert("ceil".to_string(), unary_math("ceil", f64::ceil));
    math.insert("round".to_string(), unary_math("round", f64::round));
    math.insert("max".to_string(), spread_math("max", f64::max));
    math.insert("min".to_string(), spread_math("min", f64::min));

    let random = Value::native("random", |args: &[Value]| {
        let [min, max] = args else {
            return Err(QuillError::runtime(format!(
                "Math.random expects exactly 2 arguments, found {}",
                args.len()
            )));
        };

        let lo = expect_number(min, "random")?.ceil() as i64;
        let hi = expect_number(max, "random")?.floor() as i64;

        if lo > hi {
            return Err(QuillError::runtime(format!(
                "Math.random: empty range [{lo}, {hi}]"
            )));
        }

        let drawn = rand::thread_rng().gen_range(lo..=hi);

        Ok(Value::Number(drawn as f64))
    });

    math.insert("random".to_string(), random);

    Value::object(math)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_numeric_table() {
        let six = Value::Number(6.0);
        let four = Value::Number(4.0);

        assert_eq!(eval_binary(&six, "+", &four).unwrap(), Value::Number(10.0));
        assert_eq!(eval_binary(&six, "//", &four).unwrap(), Value::Number(1.0));
        assert_eq!(eval_binary(&six, "^", &four).unwrap(), Value::Number(1296.0));
        assert_eq!(eval_binary(&six, "%", &four).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn floor_division_truncates_toward_negative_infinity() {
        let lhs = Value::Number(-7.0);
        let rhs = Value::Number(2.0);

        assert_eq!(eval_binary(&lhs, "//", &rhs).unwrap(), Value::Number(-4.0));
    }

    #[test]
    fn logical_operators_require_booleans() {
        let t = Value::Bool(true);
        let one = Value::Number(1.0);

        assert_eq!(eval_binary(&t, "&&", &t).unwrap(), Value::Bool(true));
        assert!(eval_binary(&t, "&&", &one).is_err());
    }

    #[test]
    fn comparison_requires_numbers() {
        let a = Value::string("a");
        let b = Value::string("b");

        assert!(eval_binary(&a, "<", &b).is_err());
    }

    #[test]
    fn equality_spans_tags_without_error() {
        let one = Value::Number(1.0);
        let t = Value::Bool(true);

        assert_eq!(eval_binary(&one, "==", &t).unwrap(), Value::Bool(false));
        assert_eq!(eval_binary(&one, "!=", &t).unwrap(), Value::Bool(true));
    }

    #[test]
    fn computed_index_bounds_checked() {
        let arr = Value::array(vec![Value::Number(1.0)]);

        assert!(computed_access(&arr, &Value::Number(0.0), None).is_ok());
        assert!(computed_access(&arr, &Value::Number(1.0), None).is_err());
        assert!(computed_access(&arr, &Value::Number(0.5), None).is_err());
        assert!(computed_access(&arr, &Value::Number(-1.0), None).is_err());
    }

    #[test]
    fn missing_object_key_reads_unassigned() {
        let obj = Value::object(HashMap::new());
        let key = Value::string("ghost");

        assert_eq!(
            computed_access(&obj, &key, None).unwrap(),
            Value::Unassigned
        );
    }
}
