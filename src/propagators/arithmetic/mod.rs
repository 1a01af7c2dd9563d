pub(crate) mod maximum;
