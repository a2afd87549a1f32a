/// Permission Evaluation
///
/// Decides whether a role's granted permission set satisfies the permissions
/// a request requires. Permissions are atomic capability strings such as
/// `"post.create"`, bundled into roles.
///
/// The check is plain subset containment: every required permission must be
/// present among the granted ones. A singleton requirement degenerates to set
/// membership, so a separate single-element path is not needed. Order and
/// duplicates in `required` are irrelevant, and `granted` need not be sorted.
///
/// An *empty* requirement never reaches this function: callers short-circuit
/// before consulting the evaluator, because "no permission needed" admits
/// unauthenticated requests outright.
pub fn permits(required: &[&str], granted: &[String]) -> bool {
    required
        .iter()
        .all(|needed| granted.iter().any(|have| have == needed))
}
