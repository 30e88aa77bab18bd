//! Demonstrates building a small arithmetic grammar on top of `lazylr` and driving it with
//! an `Evaluator` that assembles an AST.

mod ast;
mod lexer;

use std::convert::Infallible;
use std::env;

use lazylr::{
    Associativity, Evaluator, Grammar, NonTerminal, Precedence, PrecedenceMap, Production, Parser,
    Symbol, Terminal,
};

use ast::{BinaryOp, Expr, UnaryOp};
use lexer::Lexer;

struct CalculatorProductions {
    add: Production,
    sub: Production,
    mul: Production,
    div: Production,
    group: Production,
    number: Production,
    negate: Production,
}

fn build_grammar() -> (Grammar, PrecedenceMap, CalculatorProductions) {
    let e = NonTerminal::new("E").unwrap();
    let t = NonTerminal::new("T").unwrap();
    let f = NonTerminal::new("F").unwrap();

    let plus = Terminal::new("+").unwrap();
    let minus = Terminal::new("-").unwrap();
    let star = Terminal::new("*").unwrap();
    let slash = Terminal::new("/").unwrap();
    let lparen = Terminal::new("(").unwrap();
    let rparen = Terminal::new(")").unwrap();
    let num = Terminal::new("NUM").unwrap();

    let add = Production::new(
        e.clone(),
        vec![
            Symbol::NonTerminal(e.clone()),
            Symbol::Terminal(plus.clone()),
            Symbol::NonTerminal(t.clone()),
        ],
    )
    .unwrap();
    let sub = Production::new(
        e.clone(),
        vec![
            Symbol::NonTerminal(e.clone()),
            Symbol::Terminal(minus.clone()),
            Symbol::NonTerminal(t.clone()),
        ],
    )
    .unwrap();
    let e_pass = Production::new(e.clone(), vec![Symbol::NonTerminal(t.clone())]).unwrap();

    let mul = Production::new(
        t.clone(),
        vec![
            Symbol::NonTerminal(t.clone()),
            Symbol::Terminal(star.clone()),
            Symbol::NonTerminal(f.clone()),
        ],
    )
    .unwrap();
    let div = Production::new(
        t.clone(),
        vec![
            Symbol::NonTerminal(t.clone()),
            Symbol::Terminal(slash.clone()),
            Symbol::NonTerminal(f.clone()),
        ],
    )
    .unwrap();
    let t_pass = Production::new(t.clone(), vec![Symbol::NonTerminal(f.clone())]).unwrap();

    let group = Production::new(
        f.clone(),
        vec![
            Symbol::Terminal(lparen),
            Symbol::NonTerminal(e.clone()),
            Symbol::Terminal(rparen),
        ],
    )
    .unwrap();
    let number = Production::new(f.clone(), vec![Symbol::Terminal(num)]).unwrap();
    let negate = Production::new(
        f.clone(),
        vec![Symbol::Terminal(minus.clone()), Symbol::NonTerminal(f.clone())],
    )
    .unwrap();

    let productions = vec![
        add.clone(),
        sub.clone(),
        e_pass,
        mul.clone(),
        div.clone(),
        t_pass,
        group.clone(),
        number.clone(),
        negate.clone(),
    ];
    let grammar = Grammar::new(e, productions).unwrap();

    let mut precedence = PrecedenceMap::new();
    precedence.set_terminal(plus, Precedence::new(10, Associativity::Left).unwrap());
    precedence.set_terminal(minus, Precedence::new(10, Associativity::Left).unwrap());
    precedence.set_terminal(star, Precedence::new(20, Associativity::Left).unwrap());
    precedence.set_terminal(slash, Precedence::new(20, Associativity::Left).unwrap());
    precedence.set_production(negate.clone(), Precedence::new(30, Associativity::Right).unwrap());

    let productions = CalculatorProductions {
        add,
        sub,
        mul,
        div,
        group,
        number,
        negate,
    };

    (grammar, precedence, productions)
}

struct CalculatorEvaluator {
    productions: CalculatorProductions,
}

impl Evaluator<Expr> for CalculatorEvaluator {
    type Error = Infallible;

    fn evaluate_terminal(&mut self, terminal: &Terminal) -> Expr {
        if terminal.name() == "NUM" {
            let value = terminal.value().unwrap_or("0").parse().unwrap_or(0.0);
            Expr::Number(value)
        } else {
            Expr::Number(0.0)
        }
    }

    fn evaluate(&mut self, production: &Production, mut values: Vec<Expr>) -> Result<Expr, Infallible> {
        let p = &self.productions;
        let expr = if production == &p.add {
            Expr::binary(values.remove(0), BinaryOp::Add, values.remove(1))
        } else if production == &p.sub {
            Expr::binary(values.remove(0), BinaryOp::Subtract, values.remove(1))
        } else if production == &p.mul {
            Expr::binary(values.remove(0), BinaryOp::Multiply, values.remove(1))
        } else if production == &p.div {
            Expr::binary(values.remove(0), BinaryOp::Divide, values.remove(1))
        } else if production == &p.group {
            values.remove(1)
        } else if production == &p.number {
            values.remove(0)
        } else if production == &p.negate {
            Expr::unary(UnaryOp::Negate, values.remove(1))
        } else {
            // Pass-through productions (`E -> T`, `T -> F`, and the augmented `S' -> E`)
            // all have exactly one symbol in their body; forward its value unchanged.
            values.into_iter().next().unwrap_or(Expr::Number(0.0))
        };
        Ok(expr)
    }
}

fn evaluate(input: &str) -> Result<Expr, String> {
    let (grammar, precedence, productions) = build_grammar();
    let parser = Parser::new(grammar, precedence).map_err(|e| e.to_string())?;
    let tokens = Lexer::new(input).tokenize().map_err(|e| e.to_string())?;
    let mut evaluator = CalculatorEvaluator { productions };
    parser
        .parse(tokens, &mut evaluator)
        .map_err(|e| e.to_string())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 1 {
        let expr = args[1..].join(" ");
        match evaluate(&expr) {
            Ok(ast) => println!("{} = {}", ast.pretty_print(), ast.evaluate()),
            Err(e) => eprintln!("error: {}", e),
        }
        return;
    }

    let expressions = [
        "42",
        "2 + 3",
        "2 + 3 * 4",
        "(2 + 3) * 4",
        "10 / 2 - 3",
        "-5 + 3",
        "-(2 + 3) * 4",
    ];
    for expr_str in expressions {
        match evaluate(expr_str) {
            Ok(ast) => println!("{} => {} = {}", expr_str, ast.pretty_print(), ast.evaluate()),
            Err(e) => println!("{} => error: {}", expr_str, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_example_expressions() {
        let cases = [
            ("42", 42.0),
            ("2 + 3", 5.0),
            ("2 + 3 * 4", 14.0),
            ("(2 + 3) * 4", 20.0),
            ("10 / 2 - 3", 2.0),
            ("-5 + 3", -2.0),
            ("-(2 + 3) * 4", -20.0),
        ];
        for (expr, expected) in cases {
            let result = evaluate(expr).unwrap().evaluate();
            assert!(
                (result - expected).abs() < 0.0001,
                "'{}' evaluated to {} but expected {}",
                expr,
                result,
                expected
            );
        }
    }

    #[test]
    fn left_associativity_of_subtraction() {
        // 10 - 2 - 3 must parse as (10 - 2) - 3 = 5, not 10 - (2 - 3) = 11.
        let result = evaluate("10 - 2 - 3").unwrap();
        assert_eq!(result.evaluate(), 5.0);
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let result = evaluate("2 + 3 * 4").unwrap();
        assert_eq!(result.pretty_print(), "(2 + (3 * 4))");
    }
}
