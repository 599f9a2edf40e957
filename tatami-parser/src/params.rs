//! CSI parameter parsing
//!
//! Parameters are semicolon-separated decimal numbers; a parameter may
//! carry colon-separated sub-parameters (SGR underline styles and the
//! `38:2::r:g:b` color forms). Empty parameters and sub-parameters
//! count as zero.

/// Maximum number of parameters tracked; the rest are dropped
const MAX_PARAMS: usize = 32;

/// Parsed CSI parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    /// Parameter values (0 means default/unspecified)
    values: Vec<u16>,
    /// Colon-separated subparameters, aligned with `values`
    subparams: Vec<Vec<u16>>,
}

impl Params {
    /// Create empty params
    pub fn new() -> Self {
        Self::default()
    }

    /// Create params from a slice (no subparameters)
    pub fn from_slice(values: &[u16]) -> Self {
        Self {
            values: values.to_vec(),
            subparams: vec![Vec::new(); values.len()],
        }
    }

    /// Parse the raw parameter bytes of a CSI sequence
    pub fn parse(bytes: &[u8]) -> Self {
        let mut params = Self::new();
        if bytes.is_empty() {
            return params;
        }

        let mut group: Vec<u16> = Vec::new();
        let mut current: u16 = 0;
        for &byte in bytes {
            match byte {
                b'0'..=b'9' => {
                    current = current
                        .saturating_mul(10)
                        .saturating_add((byte - b'0') as u16);
                }
                b':' => {
                    group.push(current);
                    current = 0;
                }
                b';' => {
                    group.push(current);
                    params.push_group(&mut group);
                    current = 0;
                }
                _ => {}
            }
        }
        group.push(current);
        params.push_group(&mut group);
        params
    }

    fn push_group(&mut self, group: &mut Vec<u16>) {
        if self.values.len() < MAX_PARAMS {
            self.values.push(group[0]);
            self.subparams.push(group[1..].to_vec());
        }
        group.clear();
    }

    /// Get parameter at index; zero/missing means "default" and yields None
    pub fn get(&self, index: usize) -> Option<u16> {
        self.values.get(index).copied().filter(|&v| v != 0)
    }

    /// Get parameter at index, falling back to a default for zero/missing
    pub fn get_or(&self, index: usize, default: u16) -> u16 {
        self.get(index).unwrap_or(default)
    }

    /// Get the raw value at index (0 if not present)
    pub fn raw(&self, index: usize) -> u16 {
        self.values.get(index).copied().unwrap_or(0)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Subparameters of the parameter at index
    pub fn subparams(&self, index: usize) -> &[u16] {
        self.subparams.get(index).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Iterate over parameter values
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.values.iter().copied()
    }

    /// Iterate over (value, subparameters) pairs
    pub fn iter_with_subparams(&self) -> impl Iterator<Item = (u16, &[u16])> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &v)| (v, self.subparams(i)))
    }
}
