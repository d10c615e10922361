//! The Spec Store: an in-memory, read-only-after-load representation of
//! F as a CNF clause database with named universal (X) and existential
//! (Y) variables.
use {
    super::{
        error::{SynthResult, SynthesisError},
        formula::{Clause, Cnf},
        lit::Lit,
        var::{Var, VarId, VarKind},
    },
    std::collections::BTreeMap,
};

/// F, plus the (X, Y) partition. Read-only after [`SpecStore::from_qdimacs`]
/// or [`SpecStore::new`] returns. The Dependency Analyzer later attaches a
/// `rank` to each existential variable but never changes the clause set or
/// the partition itself.
#[derive(Clone, Debug)]
pub struct SpecStore {
    clauses: Vec<Clause>,
    vars: BTreeMap<VarId, Var>,
}

impl SpecStore {
    /// Builds a store from an explicit clause list and partition. Variables
    /// that occur in a clause but are named in neither `universal` nor
    /// `existential` default to universal.
    pub fn new(clauses: Vec<Clause>, universal: &[VarId], existential: &[VarId]) -> Self {
        let mut vars = BTreeMap::new();
        for &v in universal {
            vars.insert(v, Var::new(v, VarKind::Universal));
        }
        for &v in existential {
            vars.insert(v, Var::new(v, VarKind::Existential));
        }
        for clause in &clauses {
            for lit in clause.literals() {
                vars.entry(lit.var())
                    .or_insert_with(|| Var::new(lit.var(), VarKind::Universal));
            }
        }
        SpecStore { clauses, vars }
    }

    /// Parses a QDIMACS-shaped input: an optional run of quantifier lines
    /// (`a v1 v2 ... 0` universal, `e v1 v2 ... 0` existential), the `p cnf
    /// nvars nclauses` header, then the CNF matrix. The first quantifier
    /// block is conventionally universal and the second existential; this
    /// reader accepts them in either textual order (QDIMACS always writes
    /// them outermost-first, universal-then-existential) but does not
    /// require more than one block of each kind -- a robustness relaxation
    /// an external QDIMACS parser is free to tighten.
    pub fn from_qdimacs(text: &str) -> SynthResult<SpecStore> {
        let mut universal = Vec::new();
        let mut existential = Vec::new();
        let mut clauses = Vec::new();
        let mut current: Vec<Lit> = Vec::new();
        let mut seen_header = false;

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('c') {
                continue;
            }
            if let Some(rest) = line.strip_prefix('p') {
                let fields: Vec<&str> = rest.split_whitespace().collect();
                if fields.len() != 3 || fields[0] != "cnf" {
                    return Err(SynthesisError::MalformedInput {
                        line: line_no,
                        detail: "expected `p cnf <nvars> <nclauses>`".to_string(),
                    });
                }
                seen_header = true;
                continue;
            }
            if let Some(rest) = line.strip_prefix('a') {
                for tok in rest.split_whitespace() {
                    let v = parse_var(tok, line_no)?;
                    if v != 0 {
                        universal.push(v);
                    }
                }
                continue;
            }
            if let Some(rest) = line.strip_prefix('e') {
                for tok in rest.split_whitespace() {
                    let v = parse_var(tok, line_no)?;
                    if v != 0 {
                        existential.push(v);
                    }
                }
                continue;
            }
            if !seen_header {
                return Err(SynthesisError::MalformedInput {
                    line: line_no,
                    detail: "clause appears before `p cnf` header".to_string(),
                });
            }
            for tok in line.split_whitespace() {
                let n: i32 = tok.parse().map_err(|_| SynthesisError::MalformedInput {
                    line: line_no,
                    detail: format!("not an integer: {tok}"),
                })?;
                if n == 0 {
                    let clause =
                        Clause::from_literals(current.drain(..)).ok_or_else(|| {
                            SynthesisError::MalformedInput {
                                line: line_no,
                                detail: "tautological clause".to_string(),
                            }
                        })?;
                    clauses.push(clause);
                } else {
                    current.push(Lit::from_i32(n));
                }
            }
        }
        if !current.is_empty() {
            return Err(SynthesisError::MalformedInput {
                line: text.lines().count(),
                detail: "final clause missing terminating 0".to_string(),
            });
        }
        Ok(SpecStore::new(clauses, &universal, &existential))
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn as_cnf(&self) -> Cnf {
        Cnf::from_clauses(self.clauses.iter().cloned())
    }

    pub fn vars(&self) -> impl Iterator<Item = &Var> {
        self.vars.values()
    }

    pub fn var(&self, id: VarId) -> Option<&Var> {
        self.vars.get(&id)
    }

    pub fn universals(&self) -> Vec<VarId> {
        self.vars
            .values()
            .filter(|v| !v.is_existential())
            .map(|v| v.id)
            .collect()
    }

    /// Existential variable ids, in declaration order (ascending id). The
    /// Dependency Analyzer consumes this and produces the real topological
    /// order; nothing downstream should rely on this order directly.
    pub fn existentials(&self) -> Vec<VarId> {
        self.vars
            .values()
            .filter(|v| v.is_existential())
            .map(|v| v.id)
            .collect()
    }

    pub fn max_var(&self) -> VarId {
        self.vars.keys().copied().max().unwrap_or(0)
    }

    pub fn set_rank(&mut self, var: VarId, rank: usize) {
        if let Some(v) = self.vars.get_mut(&var) {
            v.rank = Some(rank);
        }
    }

    pub fn rank(&self, var: VarId) -> Option<usize> {
        self.vars.get(&var).and_then(|v| v.rank)
    }

    /// The cofactor F|_{var=value}: clauses containing a literal satisfied
    /// by the assignment are dropped, and the opposite literal is removed
    /// from every remaining clause. Used by the Hard-to-Learn Fallback to
    /// compute semantic Â_i/Ĉ_i.
    pub fn cofactor(&self, var: VarId, value: bool) -> Cnf {
        let fixed = Lit::new(var, value);
        let mut out = Cnf::new();
        'clauses: for clause in &self.clauses {
            let mut kept = Vec::with_capacity(clause.literals().len());
            for &lit in clause.literals() {
                if lit == fixed {
                    continue 'clauses;
                }
                if lit.var() == var {
                    continue;
                }
                kept.push(lit);
            }
            if let Some(c) = Clause::from_literals(kept) {
                // an empty clause here is the constant false: the cofactor
                // forces a contradiction.
                out.push(c);
            }
        }
        out
    }
}

fn parse_var(tok: &str, line: usize) -> SynthResult<VarId> {
    let n: i64 = tok.parse().map_err(|_| SynthesisError::MalformedInput {
        line,
        detail: format!("not an integer: {tok}"),
    })?;
    if n < 0 {
        return Err(SynthesisError::MalformedInput {
            line,
            detail: "quantifier block variables must be non-negative".to_string(),
        });
    }
    Ok(n as VarId)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
c the 4-variable verification example used throughout the test suite
p cnf 4 4
a 2 3 0
e 1 4 0
-1 2 0
-1 3 0
1 2 3 0
4 0
";

    #[test]
    fn parses_quantifier_blocks_and_matrix() {
        let spec = SpecStore::from_qdimacs(EXAMPLE).expect("valid qdimacs");
        assert_eq!(spec.universals(), vec![2, 3]);
        assert_eq!(spec.existentials(), vec![1, 4]);
        assert_eq!(spec.clauses().len(), 4);
    }

    #[test]
    fn unnamed_variable_defaults_to_universal() {
        let text = "p cnf 2 1\ne 1 0\n1 2 0\n";
        let spec = SpecStore::from_qdimacs(text).expect("valid qdimacs");
        assert_eq!(spec.var(2).unwrap().kind, VarKind::Universal);
    }

    #[test]
    fn cofactor_drops_satisfied_clauses_and_shrinks_others() {
        let spec = SpecStore::from_qdimacs(EXAMPLE).expect("valid qdimacs");
        // F|_{y1=0}: clauses (-1 | 2) and (-1 | 3) become satisfied (dropped),
        // (1 | 2 | 3) shrinks to (2 | 3), (y4) is untouched.
        let cof = spec.cofactor(1, false);
        assert_eq!(cof.len(), 2);
    }

    #[test]
    fn rejects_clause_before_header() {
        let text = "1 2 0\np cnf 2 1\n";
        assert!(matches!(
            SpecStore::from_qdimacs(text),
            Err(SynthesisError::MalformedInput { .. })
        ));
    }
}
