//! Expands the members of a bracket expression into a [CharacterSet].

use bre_runtime::CharacterSet;

use crate::ast::BracketExpression;
use crate::CompileError;

/// Builds the set a bracket expression, starting at `offset`, matches.
///
/// A `-` with a member on either side forms an inclusive range whose lower
/// bound is the member written immediately before it, so chained ranges such
/// as `a-c-e` cover `a-c` and `c-e`. A `-` written first or last is a member.
pub(crate) fn build(
    offset: usize,
    expression: BracketExpression,
) -> Result<CharacterSet, CompileError> {
    let (negated, items) = match expression {
        BracketExpression::Items(items) => (false, items),
        BracketExpression::NegatedItems(items) => (true, items),
    };

    let mut set = CharacterSet::empty();
    let mut idx = 0;
    while let Some(&item) = items.get(idx) {
        let lower = idx.checked_sub(1).and_then(|prev| items.get(prev));

        match (item, lower, items.get(idx + 1)) {
            (b'-', Some(&lower), Some(&upper)) if lower > upper => {
                return Err(CompileError::InvalidRange {
                    offset,
                    lower: char::from(lower),
                    upper: char::from(upper),
                })
            }
            (b'-', Some(&lower), Some(&upper)) => {
                set.insert_range(lower..=upper);
                idx += 2;
            }
            (item, _, _) => {
                set.insert(item);
                idx += 1;
            }
        }
    }

    match negated {
        true => Ok(set.invert_membership()),
        false => Ok(set),
    }
}
