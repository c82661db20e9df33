/// Missing structure found while building a carousel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CarouselError {
    #[error("carousel element does not exist in the document")]
    UnknownElement,
    #[error("carousel has no `.carousel__wrapper` element")]
    MissingWrapper,
    #[error("carousel has no `.carousel__list` element")]
    MissingList,
    #[error("carousel list has no `.carousel__item` elements")]
    NoItems,
}
