//! Parsing `ROLE=N` target arguments.

use troupe_core::{RoleName, TargetSpec};
use troupe_error::{RebalanceError, RebalanceErrorKind, TroupeResult};

/// Parse one `ROLE=N` pair.
///
/// The split is at the last `=`, so a role name may itself contain one.
///
/// # Examples
///
/// ```
/// use troupe::parse_target_arg;
///
/// let (role, n) = parse_target_arg("Old Kim=3").unwrap();
/// assert_eq!(role.as_str(), "Old Kim");
/// assert_eq!(n, 3);
/// assert!(parse_target_arg("Mina").is_err());
/// ```
pub fn parse_target_arg(arg: &str) -> Result<(RoleName, usize), RebalanceError> {
    let invalid = |reason: &str| {
        RebalanceError::new(RebalanceErrorKind::InvalidTarget(format!(
            "'{}' {}",
            arg, reason
        )))
    };

    let (name, count) = arg
        .rsplit_once('=')
        .ok_or_else(|| invalid("is not of the form ROLE=N"))?;
    let role = RoleName::new(name);
    if role.is_empty() {
        return Err(invalid("has no role name"));
    }
    let count = count
        .trim()
        .parse::<usize>()
        .map_err(|_| invalid("does not end in a non-negative line count"))?;
    Ok((role, count))
}

/// Parse every `ROLE=N` argument into a target. A role may appear once.
pub fn parse_targets<I, S>(args: I) -> TroupeResult<TargetSpec>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut target = TargetSpec::new();
    for arg in args {
        let (role, count) = parse_target_arg(arg.as_ref())?;
        if target.get(&role).is_some() {
            return Err(RebalanceError::new(RebalanceErrorKind::InvalidTarget(format!(
                "role '{}' is given more than once",
                role
            )))
            .into());
        }
        target.insert(role, count);
    }
    Ok(target)
}
