mod merge_end_to_end;
mod profile_resolution;
mod supplemental_overrides;
