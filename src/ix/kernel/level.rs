use crate::ix::env::{Level, LevelData, Name};

/// Substitute universe parameters `params[i] := values[i]` in `level`.
/// Parameters without a matching value are left in place.
pub fn subst_level(level: &Level, params: &[Name], values: &[Level]) -> Level {
  match level.as_data() {
    LevelData::Zero => level.clone(),
    LevelData::Succ(inner) => Level::succ(subst_level(inner, params, values)),
    LevelData::Max(a, b) => Level::max(
      subst_level(a, params, values),
      subst_level(b, params, values),
    ),
    LevelData::Imax(a, b) => Level::imax(
      subst_level(a, params, values),
      subst_level(b, params, values),
    ),
    LevelData::Param(name) => params
      .iter()
      .zip(values)
      .find(|(p, _)| *p == name)
      .map_or_else(|| level.clone(), |(_, v)| v.clone()),
    LevelData::Mvar(..) => level.clone(),
  }
}

// ============================================================================
// Normalization and comparison
// ============================================================================

/// Push `succ` through `max`, drop `max 0 _`, and resolve `imax` whenever
/// its right side is known to be zero or a successor.
pub fn simplify(l: &Level) -> Level {
  match l.as_data() {
    LevelData::Zero | LevelData::Param(..) | LevelData::Mvar(..) => l.clone(),
    LevelData::Succ(inner) => Level::succ(simplify(inner)),
    LevelData::Max(a, b) => merge_max(&simplify(a), &simplify(b)),
    LevelData::Imax(a, b) => {
      let a = simplify(a);
      let b = simplify(b);
      match b.as_data() {
        LevelData::Zero => b,
        LevelData::Succ(..) => merge_max(&a, &b),
        _ if is_zero_or_one(&a) => b,
        _ => Level::imax(a, b),
      }
    },
  }
}

fn merge_max(l: &Level, r: &Level) -> Level {
  match (l.as_data(), r.as_data()) {
    (LevelData::Zero, _) => r.clone(),
    (_, LevelData::Zero) => l.clone(),
    (LevelData::Succ(a), LevelData::Succ(b)) => Level::succ(merge_max(a, b)),
    _ if l == r => l.clone(),
    _ => Level::max(l.clone(), r.clone()),
  }
}

fn is_zero_or_one(l: &Level) -> bool {
  match l.as_data() {
    LevelData::Zero => true,
    LevelData::Succ(inner) => matches!(inner.as_data(), LevelData::Zero),
    _ => false,
  }
}

/// `l <= r` for every assignment of the parameters. Incomplete for `imax`
/// over parameters: those compare only when syntactically equal.
pub fn leq(l: &Level, r: &Level) -> bool {
  leq_offset(&simplify(l), &simplify(r), 0)
}

/// `l <= r + diff`.
fn leq_offset(l: &Level, r: &Level, diff: i64) -> bool {
  match (l.as_data(), r.as_data()) {
    (LevelData::Zero, _) if diff >= 0 => true,
    (_, LevelData::Zero) if diff < 0 => false,
    (LevelData::Param(a), LevelData::Param(b))
    | (LevelData::Mvar(a), LevelData::Mvar(b)) => a == b && diff >= 0,
    (LevelData::Succ(inner), _) => leq_offset(inner, r, diff - 1),
    (_, LevelData::Succ(inner)) => leq_offset(l, inner, diff + 1),
    (LevelData::Max(a, b), _) => {
      leq_offset(a, r, diff) && leq_offset(b, r, diff)
    },
    (_, LevelData::Max(a, b)) => {
      leq_offset(l, a, diff) || leq_offset(l, b, diff)
    },
    (LevelData::Imax(..), LevelData::Imax(..)) => l == r && diff >= 0,
    _ => false,
  }
}

/// Universe equality by antisymmetry.
pub fn eq_antisymm(l: &Level, r: &Level) -> bool {
  l == r || (leq(l, r) && leq(r, l))
}

pub fn eq_antisymm_many(ls: &[Level], rs: &[Level]) -> bool {
  ls.len() == rs.len() && ls.iter().zip(rs).all(|(l, r)| eq_antisymm(l, r))
}
