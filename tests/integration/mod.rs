mod helpers;
mod test_align;
mod test_sync;
