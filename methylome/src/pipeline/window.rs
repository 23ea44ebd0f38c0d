use crate::{fragment::Fragment, region::Region};

/// Keeps CpG calls inside the region, in their original order.
pub fn filter_window_cpg(mut fragment: Fragment, region: &Region) -> Fragment {
    fragment
        .calls
        .retain(|c| region.contains(c.position) && c.call.is_cpg());
    fragment
}
