mod count;
mod maximum;
mod views;
