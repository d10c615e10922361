//! Total variable assignments: the shape of a sample, and of models
//! returned by the SAT/MaxSAT collaborators.
use {
    super::{lit::Lit, var::VarId},
    std::collections::BTreeMap,
    std::fmt,
};

/// A total mapping `Var -> {0,1}`. Dense storage indexed by variable id;
/// index 0 is unused so ids can be compared directly against DIMACS
/// numbering.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Assignment {
    values: Vec<Option<bool>>,
}

impl Assignment {
    pub fn with_capacity(max_var: VarId) -> Self {
        Assignment {
            values: vec![None; max_var as usize + 1],
        }
    }

    pub fn set(&mut self, var: VarId, value: bool) {
        if self.values.len() <= var as usize {
            self.values.resize(var as usize + 1, None);
        }
        self.values[var as usize] = Some(value);
    }

    pub fn set_lit(&mut self, lit: Lit) {
        self.set(lit.var(), lit.is_positive());
    }

    pub fn get(&self, var: VarId) -> Option<bool> {
        self.values.get(var as usize).copied().flatten()
    }

    /// Panics if `var` is unbound; used once a sample is known total.
    pub fn value_of(&self, var: VarId) -> bool {
        self.get(var)
            .unwrap_or_else(|| panic!("variable {var} is unbound in this assignment"))
    }

    pub fn satisfies(&self, lit: Lit) -> Option<bool> {
        self.get(lit.var()).map(|v| v == lit.is_positive())
    }

    /// Returns a copy with `var` forced to `value`, leaving everything else
    /// untouched. Used by the Labeler to probe both polarities of `y_i`.
    pub fn with(&self, var: VarId, value: bool) -> Assignment {
        let mut clone = self.clone();
        clone.set(var, value);
        clone
    }

    pub fn vars(&self) -> impl Iterator<Item = VarId> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|_| i as VarId))
    }

    pub fn to_map(&self) -> BTreeMap<VarId, bool> {
        self.vars().map(|v| (v, self.value_of(v))).collect()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self
            .vars()
            .map(|v| {
                let val = self.value_of(v);
                if val {
                    format!("{v}")
                } else {
                    format!("-{v}")
                }
            })
            .collect();
        write!(f, "[{}]", parts.join(" "))
    }
}
